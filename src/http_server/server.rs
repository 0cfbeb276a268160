//! HTTP server assembly.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::observability::Logger;
use crate::store::PhaseStore;

use super::config::HttpServerConfig;
use super::record_routes::{record_routes, RecordState};

/// HTTP server for the record API.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Build the server over the given store.
    pub fn new(config: HttpServerConfig, store: Arc<dyn PhaseStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, store: Arc<dyn PhaseStore>) -> Router {
        let record_state = Arc::new(RecordState::new(store));

        let cors = if config.cors_origins.is_empty() {
            // No origins configured: permissive, for development use
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/api", record_routes(record_state))
            .layer(cors)
    }

    /// Get the socket address.
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing).
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .expect("Invalid socket address");

        let listener = TcpListener::bind(addr).await?;
        Logger::info("HTTP_SERVER_STARTED", &[("addr", &addr.to_string())]);
        axum::serve(listener, self.router).await
    }
}

// ==================
// Health
// ==================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
