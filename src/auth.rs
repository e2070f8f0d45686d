//! HTTP Basic Authentication.
//!
//! Credentials are loaded once at startup from a `user:sha512-hex` file and
//! shared read-only across requests. The middleware short-circuits with a
//! 401 challenge before a request reaches routing, so the file handlers
//! never see an unauthenticated request.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose, Engine as _};
use const_format::formatcp;
use http::{header, StatusCode};
use sha2::{Digest, Sha512};

use crate::config::AUTH_REALM;

/// Challenge sent with every rejected response.
const CHALLENGE: &str = formatcp!(r#"Basic realm="{}""#, AUTH_REALM);

/// Loaded credential set: user name to lowercase hex SHA-512 digest.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    users: HashMap<String, String>,
}

/// Failure loading the credentials file. This aborts server startup before
/// any socket is opened.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("Failed to read credentials file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed credentials file {path}: line {line} is not 'user:sha512-hash'")]
    Malformed { path: PathBuf, line: usize },
}

/// Load a credentials file: one `user:sha512-hex` pair per line, blank
/// lines skipped.
pub fn load_credentials(path: &Path) -> Result<Credentials, CredentialsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut users = HashMap::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((user, hash)) if !user.is_empty() && !hash.is_empty() => {
                users.insert(user.to_string(), hash.to_ascii_lowercase());
            }
            _ => {
                return Err(CredentialsError::Malformed {
                    path: path.to_path_buf(),
                    line: idx + 1,
                })
            }
        }
    }
    Ok(Credentials { users })
}

impl Credentials {
    /// Check a user/password pair against the loaded set.
    pub fn verify(&self, user: &str, password: &str) -> bool {
        self.users
            .get(user)
            .is_some_and(|hash| *hash == sha512_hex(password.as_bytes()))
    }
}

fn sha512_hex(data: &[u8]) -> String {
    let digest = Sha512::digest(data);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Middleware enforcing Basic Auth for every request.
pub async fn basic_auth_layer(
    State(credentials): State<Arc<Credentials>>,
    request: Request,
    next: Next,
) -> Response {
    if authorized(&credentials, &request) {
        return next.run(request).await;
    }
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, CHALLENGE)],
        "Unauthorized\n",
    )
        .into_response()
}

fn authorized(credentials: &Credentials, request: &Request) -> bool {
    let Some(value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = general_purpose::STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(pair) = String::from_utf8(decoded) else {
        return false;
    };
    match pair.split_once(':') {
        Some((user, password)) => credentials.verify(user, password),
        None => false,
    }
}
