//! API handler for leaflog
//!
//! Each operation is one synchronous unit of work: load the dataset,
//! compute, and drop the in-memory copy. Nothing is cached across calls.
//!
//! Write path: validate -> load -> `next_id` -> build record -> append.
//! Validation runs before the dataset is touched, so a rejected request
//! never changes what `next_id` will return.
//!
//! The handler does not serialize concurrent creates. Two creates racing
//! in one process can be allocated the same id; callers that need more
//! than one writer must serialize them outside the handler.

use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use tracing::{error, info, warn};

use super::errors::{ApiError, ApiResult};
use super::request::{parse_create_request, parse_page_params};
use super::response::{CreatedResponse, MetricsResponse, PageResponse};
use crate::ids::next_id;
use crate::metrics::{compute_at, MetricsOutcome};
use crate::observability::Event;
use crate::storage::{Record, RecordStore};

/// Source of the current local wall-clock time.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// API handler over an injected record store
pub struct ApiHandler<S: RecordStore> {
    store: S,
    clock: Clock,
}

impl<S: RecordStore> ApiHandler<S> {
    /// Create a handler that stamps records with the local clock
    pub fn new(store: S) -> Self {
        Self::with_clock(store, local_now)
    }

    /// Create a handler with an explicit clock
    pub fn with_clock(store: S, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Returns the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and stores one record, returning its assigned id.
    pub fn create(&self, body: &Value) -> ApiResult<CreatedResponse> {
        let new = parse_create_request(body).map_err(|errors| {
            warn!(
                event = %Event::RecordRejected,
                errors = %errors,
                "create request rejected"
            );
            ApiError::Validation(errors)
        })?;

        let id = next_id(&self.store.load());
        let record = Record::new(id, new, (self.clock)());

        self.store.append(&record).map_err(|e| {
            error!(
                event = %Event::StorageWriteFailed,
                id,
                error = %e,
                "failed to append record"
            );
            ApiError::Storage(e)
        })?;

        info!(
            event = %Event::RecordStored,
            id,
            category = %record.detected_category,
            "record stored"
        );

        Ok(CreatedResponse::new(id))
    }

    /// Returns one page of records.
    ///
    /// `page` and `per_page` are the raw query parameter values, if present.
    pub fn list(&self, page: Option<&str>, per_page: Option<&str>) -> ApiResult<PageResponse> {
        let (page, per_page) = parse_page_params(page, per_page).map_err(|errors| {
            warn!(event = %Event::RequestRejected, errors = %errors, "list request rejected");
            ApiError::Validation(errors)
        })?;

        let page = self.store.paginate(page, per_page).map_err(|e| {
            warn!(event = %Event::RequestRejected, error = %e, "list request rejected");
            ApiError::InvalidPage(e)
        })?;

        Ok(page.into())
    }

    /// Returns the record with the given id.
    ///
    /// A non-numeric id can never have been assigned and is reported as not
    /// found.
    pub fn get(&self, id: &str) -> ApiResult<Record> {
        let parsed = id
            .trim()
            .parse::<u64>()
            .map_err(|_| ApiError::NotFound(id.to_string()))?;

        self.store
            .get_by_id(parsed)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    /// Computes metrics over the whole dataset.
    pub fn metrics(&self) -> ApiResult<MetricsResponse> {
        let records = self.store.load();

        match compute_at(&records, (self.clock)()) {
            Ok(outcome) => {
                if let MetricsOutcome::Computed(ref m) = outcome {
                    info!(
                        event = %Event::MetricsComputed,
                        total_records = m.total_records,
                        "metrics computed"
                    );
                }
                Ok(outcome.into())
            }
            Err(e) => {
                error!(event = %Event::MetricsFailed, error = %e, "metrics computation failed");
                Err(ApiError::Metrics(e))
            }
        }
    }
}
