//! Metrics computation errors
//!
//! Any of these aborts the whole computation; no partial metrics are
//! returned.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Metrics computation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// A measurement is NaN or infinite
    #[error("non-finite value in column {column} of record {id}")]
    NonFiniteValue { column: &'static str, id: u64 },

    /// Statistics requested over a column with no values
    #[error("no values in column {0}")]
    EmptyColumn(&'static str),

    /// The rolling window start cannot be represented
    #[error("cannot compute 7-day window start from {0}")]
    ClockOverflow(NaiveDateTime),
}

impl MetricsError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        500
    }
}
