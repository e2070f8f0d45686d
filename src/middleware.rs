//! Cross-cutting request middleware: the request log and common headers.
//!
//! The request log wraps each request in a tracing span carrying a UUID v4
//! request ID, so every line emitted while handling the request can be
//! correlated. The common-headers layer stamps the `Server` header on each
//! response; it is installed outermost so that auth rejections and error
//! pages carry it too.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::header::{HeaderValue, SERVER};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::SERVER_HEADER;

/// Layer setting the `Server` header on every response, exactly once.
pub fn common_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(SERVER, HeaderValue::from_static(SERVER_HEADER))
}

/// Request-logging middleware.
///
/// Emits one completion line per request with status and duration, inside
/// a span identifying the request.
pub async fn request_log_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    let start = Instant::now();
    async move {
        let response = next.run(request).await;
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}
