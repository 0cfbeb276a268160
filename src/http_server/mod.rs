//! # HTTP Server
//!
//! axum routing layer over the record store. Routing is glue: every
//! request delegates to the store and the tree engines.

mod config;
mod errors;
mod record_routes;
mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse};
pub use record_routes::{record_routes, RecordState};
pub use server::HttpServer;
