//! HTTP listener lifecycle.
//!
//! Two entry points, chosen from the configuration: a plain listener, or a
//! TLS-terminating listener with the HTTP/2 offering controlled by ALPN.

mod server;

pub use server::{alpn_protocols, start_server, ServerError};
