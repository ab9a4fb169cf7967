//! Metrics over the leaf-analysis dataset
//!
//! Pure functions over a loaded record slice; nothing here touches disk.

mod describe;
mod engine;
mod errors;

pub use describe::{describe, round2, DescriptiveStats};
pub use engine::{compute_at, parse_recorded_at, Metrics, MetricsOutcome};
pub use errors::{MetricsError, MetricsResult};
