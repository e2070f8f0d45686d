//! File serving and directory listings.
//!
//! The fallback handler for everything outside the assets prefix. Files
//! are streamed through tower-http's `ServeFile`, which handles MIME
//! detection and conditional and range requests; directories serve their
//! `index.html` when present and a generated listing otherwise. Listings
//! are HTML by default and JSON when the client asks for it.

use std::fmt::Write as _;
use std::path::Path;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use http::{header, HeaderMap, Method, StatusCode, Uri};
use serde_json::json;
use tower_http::services::ServeFile;

use crate::config::{ASSETS_PREFIX, INDEX_FILE};
use crate::error::AppError;
use crate::fs::{DirEntry, Resolved};
use crate::state::AppState;

/// Fallback handler serving the content root.
pub async fn serve(State(state): State<AppState>, request: Request) -> Response {
    match handle(&state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn handle(state: &AppState, request: Request) -> Result<Response, AppError> {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return Err(AppError::MethodNotAllowed);
    }

    let path = request.uri().path().to_owned();
    match state.fs.resolve(&path).await? {
        Resolved::File(file) => {
            // Canonical file URLs have no trailing slash.
            if path.ends_with('/') {
                return Ok(redirect(request.uri(), path.trim_end_matches('/')));
            }
            serve_file(&file, request).await
        }
        Resolved::Directory(dir) => {
            // Canonical directory URLs end with a slash.
            if !path.ends_with('/') {
                return Ok(redirect(request.uri(), &format!("{path}/")));
            }
            let index = dir.join(INDEX_FILE);
            match tokio::fs::metadata(&index).await {
                Ok(meta) if meta.is_file() => serve_file(&index, request).await,
                _ => render_listing(state, &path, &dir, request.headers()).await,
            }
        }
    }
}

/// Delegate to tower-http's file service for streaming, MIME detection,
/// and conditional/range request handling.
async fn serve_file(path: &Path, request: Request) -> Result<Response, AppError> {
    let mut service = ServeFile::new(path);
    let response = service.try_call(request).await?;
    Ok(response.map(Body::new))
}

/// 301 to the canonical location, preserving the query string.
fn redirect(uri: &Uri, location: &str) -> Response {
    let location = match uri.query() {
        Some(query) => format!("{location}?{query}"),
        None => location.to_string(),
    };
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
        Body::empty(),
    )
        .into_response()
}

async fn render_listing(
    state: &AppState,
    url_path: &str,
    dir: &Path,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let entries = state.fs.list_dir(dir).await?;

    if wants_json(headers) {
        let entries: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "name": e.name,
                    "directory": e.is_dir,
                    "size": e.size,
                })
            })
            .collect();
        return Ok(Json(json!({ "path": url_path, "entries": entries })).into_response());
    }

    Ok(Html(listing_page(url_path, &entries)).into_response())
}

/// Whether the Accept header asks for a JSON listing.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| {
            accept
                .split(',')
                .any(|part| part.split(';').next().map(str::trim) == Some("application/json"))
        })
}

fn listing_page(url_path: &str, entries: &[DirEntry]) -> String {
    let mut rows = String::new();
    if url_path != "/" {
        rows.push_str(
            "        <tr><td class=\"name\"><a href=\"../\">../</a></td><td class=\"size\"></td></tr>\n",
        );
    }
    for entry in entries {
        let (href, label, size) = if entry.is_dir {
            (
                format!("{}/", urlencoding::encode(&entry.name)),
                format!("{}/", entry.name),
                String::new(),
            )
        } else {
            (
                urlencoding::encode(&entry.name).into_owned(),
                entry.name.clone(),
                format_size(entry.size),
            )
        };
        let _ = writeln!(
            rows,
            "        <tr><td class=\"name\"><a href=\"{href}\">{label}</a></td><td class=\"size\">{size}</td></tr>",
            label = html_escape(&label),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Index of {title}</title>
    <link rel="stylesheet" href="{prefix}/style.css">
</head>
<body>
    <h1>Index of {title}</h1>
    <table class="listing">
        <tr><th>Name</th><th>Size</th></tr>
{rows}    </table>
</body>
</html>"#,
        title = html_escape(url_path),
        prefix = ASSETS_PREFIX,
    )
}

/// Human-readable size, 1024-based.
fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{size}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
