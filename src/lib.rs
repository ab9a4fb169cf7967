//! leaflog - append-only logbook and metrics for leaf-disease image analysis
//!
//! A detection pipeline submits one measurement per analysed leaf image.
//! Measurements are appended to a flat comma-delimited dataset and served
//! back paginated, by identifier, and as aggregate statistics.

pub mod api;
pub mod cli;
pub mod http_server;
pub mod ids;
pub mod metrics;
pub mod observability;
pub mod storage;
