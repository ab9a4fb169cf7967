//! # HTTP Server
//!
//! Combines the record and health routers behind CORS and request tracing.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::routes::{health_routes, record_routes};
use crate::api::ApiHandler;
use crate::observability::Event;
use crate::storage::RecordStore;

/// HTTP server for the leaf-analysis log
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given handler
    pub fn new<S: RecordStore + 'static>(config: HttpServerConfig, handler: ApiHandler<S>) -> Self {
        let router = Self::build_router(&config, Arc::new(handler));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router<S: RecordStore + 'static>(
        config: &HttpServerConfig,
        handler: Arc<ApiHandler<S>>,
    ) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| match s.parse() {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        warn!(origin = %s, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(record_routes(handler))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(event = %Event::ServerListening, addr = %addr, "listening");

        let result = axum::serve(listener, self.router).await;
        info!(event = %Event::ServerStopped, "server stopped");
        result
    }
}
