//! HTTP/HTTPS server startup and lifecycle.
//!
//! Decides between the plain and TLS entry points, applies the HTTP/2
//! policy to the TLS listener, and blocks until the serve loop returns.
//! The terminal condition is passed through to the caller unchanged; no
//! retries and no restart capability live here.

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;

use crate::config::ServerConfig;

/// Server startup error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to resolve served path: {0}")]
    RootPath(std::io::Error),

    #[error("Failed to load TLS configuration: {0}")]
    TlsConfig(String),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// ALPN protocols offered by the TLS listener.
///
/// Disabling HTTP/2 leaves only `http/1.1` on offer; otherwise `h2` is
/// preferred, matching the stack default.
pub fn alpn_protocols(disable_h2: bool) -> Vec<Vec<u8>> {
    if disable_h2 {
        vec![b"http/1.1".to_vec()]
    } else {
        vec![b"h2".to_vec(), b"http/1.1".to_vec()]
    }
}

/// Parse a `host:port` listen address; an empty host binds all interfaces.
fn parse_listen_addr(address: &str) -> Result<SocketAddr, ServerError> {
    let target = if address.starts_with(':') {
        format!("0.0.0.0{address}")
    } else {
        address.to_string()
    };
    target
        .to_socket_addrs()
        .map_err(|_| ServerError::InvalidAddress(address.to_string()))?
        .next()
        .ok_or_else(|| ServerError::InvalidAddress(address.to_string()))
}

/// Start the server and block until it terminates.
///
/// Startup failures (bad address, unresolvable root) surface before any
/// socket is opened; bind and TLS failures are the terminal result of the
/// serve call itself.
pub async fn start_server(app: Router, config: &ServerConfig) -> Result<(), ServerError> {
    let addr = parse_listen_addr(&config.address)?;

    if config.log {
        let served = std::fs::canonicalize(&config.directory).map_err(ServerError::RootPath)?;
        let kind = if config.is_https() { "HTTPS" } else { "HTTP" };
        tracing::info!(
            "Starting {} server on {}, serving path {}",
            kind,
            config.address,
            served.display()
        );
    }

    if let Some((cert, key)) = config.tls_paths() {
        let rustls_config = RustlsConfig::from_pem_file(cert, key)
            .await
            .map_err(|e| ServerError::TlsConfig(e.to_string()))?;

        // Replace the stack-default ALPN list with the configured offering.
        let mut tls = (*rustls_config.get_inner()).clone();
        tls.alpn_protocols = alpn_protocols(config.disable_h2);
        let rustls_config = RustlsConfig::from_config(Arc::new(tls));

        axum_server::bind_rustls(addr, rustls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        axum_server::bind(addr)
            .serve(app.into_make_service())
            .await?;
    }

    Ok(())
}
