//! API response types

use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use super::request::FieldError;
use crate::metrics::{Metrics, MetricsOutcome};
use crate::storage::{Page, Record};

/// Message returned with a successful create.
pub const STORED_MESSAGE: &str = "Data stored";

/// Message returned when metrics are requested over an empty dataset.
pub const NO_METRICS_MESSAGE: &str = "No data available for metrics";

/// `{message, id}` body of a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: u64,
}

impl CreatedResponse {
    pub fn new(id: u64) -> Self {
        Self {
            message: STORED_MESSAGE.to_string(),
            id,
        }
    }
}

/// `{page, per_page, total, results}` body of a list request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub page: u64,
    pub per_page: u64,
    pub total: usize,
    pub results: Vec<Record>,
}

impl From<Page> for PageResponse {
    fn from(page: Page) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            results: page.results,
        }
    }
}

/// Metrics body: either the full metrics object or the empty-dataset message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricsResponse {
    Empty { message: String },
    Computed(Metrics),
}

impl From<MetricsOutcome> for MetricsResponse {
    fn from(outcome: MetricsOutcome) -> Self {
        match outcome {
            MetricsOutcome::Empty => MetricsResponse::Empty {
                message: NO_METRICS_MESSAGE.to_string(),
            },
            MetricsOutcome::Computed(metrics) => MetricsResponse::Computed(metrics),
        }
    }
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// Create from an API error
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
            details: err.field_errors().map(|e| e.to_vec()),
        }
    }
}
