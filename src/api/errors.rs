//! API error types
//!
//! Errors stay local to one request. Validation and lookup failures are the
//! caller's problem (4xx); storage write and metrics failures are ours (5xx).
//! Storage read failures never appear here: the store recovers from them.

use thiserror::Error;

use super::request::{FieldError, ValidationErrors};
use crate::metrics::MetricsError;
use crate::storage::{PageError, StorageError};

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or parameters failed validation
    #[error("invalid request: {0}")]
    Validation(ValidationErrors),

    /// Pagination parameters out of range
    #[error("invalid pagination: {0}")]
    InvalidPage(#[from] PageError),

    /// No record has the requested id
    #[error("record not found: {0}")]
    NotFound(String),

    /// Appending the record failed
    #[error("failed to store record: {0}")]
    Storage(#[from] StorageError),

    /// Metrics aggregation failed
    #[error("failed to compute metrics: {0}")]
    Metrics(#[from] MetricsError),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::InvalidPage(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Storage(_) => 500,
            ApiError::Metrics(e) => e.status_code(),
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "LEAF_INVALID_REQUEST",
            ApiError::InvalidPage(_) => "LEAF_INVALID_PAGE",
            ApiError::NotFound(_) => "LEAF_NOT_FOUND",
            ApiError::Storage(e) => e.code().code(),
            ApiError::Metrics(_) => "LEAF_METRICS_FAILED",
        }
    }

    /// Per-field problems, for validation errors
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            ApiError::Validation(errors) => Some(errors.errors()),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}
