//! staticd: a configurable static-content HTTP/HTTPS server.
//!
//! Two pieces form the core: [`routes::create_router`] assembles the
//! request pipeline (the routing core wrapped by the configured middleware
//! stages) and [`http::start_server`] drives the listener until it
//! terminates. Everything else is a collaborator: the filesystem adapter,
//! the Basic Auth credential store, and the embedded assets.

pub mod auth;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use crate::http::{start_server, ServerError};
pub use routes::create_router;
