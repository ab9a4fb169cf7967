//! API layer for leaflog
//!
//! Transport-independent operations over a [`RecordStore`]: the HTTP
//! routes and the CLI both call into [`ApiHandler`].
//!
//! # Supported Operations
//!
//! - create: validate a submission, allocate its id, append it
//! - list: one page of records plus the total count
//! - get: one record by id
//! - metrics: aggregate statistics over the dataset
//!
//! [`RecordStore`]: crate::storage::RecordStore

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiResult};
pub use handler::{ApiHandler, Clock};
pub use request::{
    parse_create_request, parse_page_params, FieldError, ValidationErrors, DEFAULT_PAGE,
    DEFAULT_PER_PAGE, REQUIRED_FIELDS,
};
pub use response::{
    CreatedResponse, ErrorResponse, MetricsResponse, PageResponse, NO_METRICS_MESSAGE,
    STORED_MESSAGE,
};
