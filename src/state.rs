//! Shared application state for request handlers.

use crate::fs::FileSystem;

/// Shared application state, cheap to clone into handlers.
///
/// Holds the filesystem adapter, constructed once at assembly time and
/// read-only afterwards; no locking is needed across concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub fs: FileSystem,
}

impl AppState {
    pub fn new(fs: FileSystem) -> Self {
        Self { fs }
    }
}
