use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use http::header;
use std::io;

use crate::config::ASSETS_PREFIX;
use crate::fs::ResolveError;

/// Request-level error, rendered as an HTML error page.
///
/// These never escalate past the handler that produced them; fatal startup
/// and serve errors have their own types in `config`, `auth`, and
/// `http::server`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("invalid request path")]
    InvalidPath,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => AppError::NotFound,
            ResolveError::InvalidPath => AppError::InvalidPath,
            ResolveError::Io(err) => AppError::Io(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidPath => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Io(_) => {
                tracing::error!("Internal error: {:?}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>{code} {reason}</title>
    <link rel="stylesheet" href="{prefix}/style.css">
</head>
<body>
    <div class="error-page">
        <h1>{code} {reason}</h1>
        <p><a href="/">Return to the root</a></p>
    </div>
</body>
</html>"#,
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Error"),
            prefix = ASSETS_PREFIX,
        );

        if matches!(self, AppError::MethodNotAllowed) {
            return (status, [(header::ALLOW, "GET, HEAD")], Html(body)).into_response();
        }
        (status, Html(body)).into_response()
    }
}
