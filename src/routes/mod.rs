//! Router assembly.
//!
//! Builds the middleware chain around the routing core according to the
//! configuration. The per-request order is fixed: common headers, then the
//! request log, then authentication, then routing. Headers are stamped on
//! every response including auth rejections; authentication gates routing
//! but is itself logged; routing never sees an unauthenticated request.

pub mod assets;
pub mod files;

use std::sync::Arc;

use axum::middleware;
use axum::Router;

use crate::auth::{self, CredentialsError};
use crate::config::{ServerConfig, ASSETS_PREFIX};
use crate::fs::FileSystem;
use crate::middleware::{common_headers_layer, request_log_layer};
use crate::state::AppState;

/// Assemble the request-handling pipeline for the given configuration.
///
/// The routing core maps the embedded assets prefix to the assets handler
/// (prefix stripped) and everything else to the file handler. The only
/// failure is a bad credentials file, reported before any socket is opened.
pub fn create_router(config: &ServerConfig) -> Result<Router, CredentialsError> {
    let fs = FileSystem::new(
        &config.directory,
        !config.disable_lookup_with_suffix,
        !config.show_dotfiles,
    );

    let mut app = Router::new()
        .nest(ASSETS_PREFIX, assets::router())
        .fallback(files::serve)
        .with_state(AppState::new(fs));

    if let Some(path) = config.password_file() {
        let credentials = auth::load_credentials(path)?;
        app = app.layer(middleware::from_fn_with_state(
            Arc::new(credentials),
            auth::basic_auth_layer,
        ));
    }

    if config.log {
        app = app.layer(middleware::from_fn(request_log_layer));
    }

    // Outermost, so every response carries the common headers.
    Ok(app.layer(common_headers_layer()))
}
