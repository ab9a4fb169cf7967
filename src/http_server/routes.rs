//! HTTP routes
//!
//! Thin adapters: decode the request, call the [`ApiHandler`], encode the
//! result. The handlers do no I/O of their own and never await between
//! loading the dataset and appending to it.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{
    ApiError, ApiHandler, CreatedResponse, ErrorResponse, MetricsResponse, PageResponse,
    ValidationErrors,
};
use crate::storage::{Record, RecordStore};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `GET /app` query parameters, kept raw so bad values are reported by
/// the API layer rather than rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default, rename = "perPage")]
    pub per_page: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from_error(&self))).into_response()
    }
}

/// Create record routes
pub fn record_routes<S: RecordStore + 'static>(handler: Arc<ApiHandler<S>>) -> Router {
    Router::new()
        .route("/app", get(list_handler::<S>).post(create_handler::<S>))
        .route("/app/:id", get(get_handler::<S>))
        .route("/metrics", get(metrics_handler::<S>))
        .with_state(handler)
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

// The body is decoded by hand so a missing or wrong Content-Type header is
// not an error, and malformed JSON reports like any other validation error.
async fn create_handler<S: RecordStore + 'static>(
    State(handler): State<Arc<ApiHandler<S>>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        ApiError::Validation(ValidationErrors::single("body", format!("invalid JSON: {}", e)))
    })?;

    let created = handler.create(&value)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_handler<S: RecordStore + 'static>(
    State(handler): State<Arc<ApiHandler<S>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    let page = handler.list(query.page.as_deref(), query.per_page.as_deref())?;
    Ok(Json(page))
}

async fn get_handler<S: RecordStore + 'static>(
    State(handler): State<Arc<ApiHandler<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(handler.get(&id)?))
}

async fn metrics_handler<S: RecordStore + 'static>(
    State(handler): State<Arc<ApiHandler<S>>>,
) -> Result<Json<MetricsResponse>, ApiError> {
    Ok(Json(handler.metrics()?))
}
