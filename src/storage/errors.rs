//! Storage error types
//!
//! Error codes:
//! - LEAF_STORAGE_READ_FAILED: dataset file could not be read
//! - LEAF_STORAGE_WRITE_FAILED: append or fsync failed
//! - LEAF_DATASET_CORRUPT: dataset file exists but does not parse
//!
//! Read-side errors never reach a caller of `RecordStore::load`; they are
//! logged and the dataset is treated as empty. Write failures always propagate.

use std::fmt;
use std::io;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Dataset file read failed
    LeafStorageReadFailed,
    /// Dataset append failed
    LeafStorageWriteFailed,
    /// Dataset contents are malformed
    LeafDatasetCorrupt,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::LeafStorageReadFailed => "LEAF_STORAGE_READ_FAILED",
            StorageErrorCode::LeafStorageWriteFailed => "LEAF_STORAGE_WRITE_FAILED",
            StorageErrorCode::LeafDatasetCorrupt => "LEAF_DATASET_CORRUPT",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message and optional row context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    /// Create a read failure wrapping an I/O error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::LeafStorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a write failure wrapping an I/O error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::LeafStorageWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a corruption error pointing at a 1-based file line
    pub fn corrupt_at_line(line: usize, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::LeafDatasetCorrupt,
            message: reason.into(),
            details: Some(format!("line: {}", line)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
