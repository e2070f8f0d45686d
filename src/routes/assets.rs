//! Embedded static assets.
//!
//! The stylesheet used by listing and error pages is compiled into the
//! binary, so the server works without support files on disk. The content
//! is process-wide, read-only, and served under a reserved prefix; the
//! prefix is stripped by the nesting router before `serve` sees the path.

use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use http::header;

use crate::error::AppError;
use crate::state::AppState;

const STYLE_CSS: &str = include_str!("../../assets/style.css");

/// Router mounted at the assets prefix.
pub fn router() -> Router<AppState> {
    Router::new().route("/{*asset}", get(serve))
}

async fn serve(Path(asset): Path<String>) -> Response {
    match asset.as_str() {
        "style.css" => (
            [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
            STYLE_CSS,
        )
            .into_response(),
        _ => AppError::NotFound.into_response(),
    }
}
