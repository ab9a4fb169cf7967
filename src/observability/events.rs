//! Observable events for leaflog
//!
//! Every log line the service emits carries one of these as its `event`
//! field, so operators can filter on a closed, stable set of names.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// HTTP listener bound
    ServerListening,
    /// HTTP server exited
    ServerStopped,

    // Write path
    /// Record appended and fsynced
    RecordStored,
    /// Create request failed validation
    RecordRejected,
    /// Append to the dataset failed
    StorageWriteFailed,

    // Read path
    /// Dataset file absent, treated as empty
    DatasetMissing,
    /// Dataset file unreadable or malformed, treated as empty
    DatasetUnreadable,
    /// List/lookup request rejected
    RequestRejected,

    // Metrics
    /// Metrics computed over the dataset
    MetricsComputed,
    /// Metrics computation failed
    MetricsFailed,
}

impl Event {
    /// Returns the stable upper-snake event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ServerStopped => "SERVER_STOPPED",
            Event::RecordStored => "RECORD_STORED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::StorageWriteFailed => "STORAGE_WRITE_FAILED",
            Event::DatasetMissing => "DATASET_MISSING",
            Event::DatasetUnreadable => "DATASET_UNREADABLE",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::MetricsComputed => "METRICS_COMPUTED",
            Event::MetricsFailed => "METRICS_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
