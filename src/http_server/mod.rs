//! # HTTP Server Module
//!
//! Serves the API layer over HTTP.
//!
//! # Endpoints
//!
//! - `POST /app` - store a record
//! - `GET /app?page=&perPage=` - list records
//! - `GET /app/{id}` - fetch one record
//! - `GET /metrics` - aggregate statistics
//! - `GET /health` - health check

pub mod config;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use routes::{health_routes, record_routes};
pub use server::HttpServer;
