//! Record store: the injected handle every request goes through
//!
//! A store exposes two primitives, `load` and `append`. Lookup and
//! pagination are linear operations over a fresh `load`; nothing is cached
//! between calls.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::warn;

use super::errors::{StorageError, StorageResult};
use super::reader::{DatasetContents, DatasetReader};
use super::record::Record;
use super::writer::DatasetWriter;
use crate::observability::Event;

/// Storage handle for the dataset.
pub trait RecordStore: Send + Sync {
    /// Returns every record in insertion order.
    ///
    /// Never fails: a missing or unreadable dataset is an empty one.
    fn load(&self) -> Vec<Record>;

    /// Appends one record durably.
    fn append(&self, record: &Record) -> StorageResult<()>;

    /// Returns the first record whose id matches, by linear scan.
    fn get_by_id(&self, id: u64) -> Option<Record> {
        find_by_id(self.load(), id)
    }

    /// Returns one page of records plus the total count.
    fn paginate(&self, page: i64, per_page: i64) -> Result<Page, PageError> {
        paginate(self.load(), page, per_page)
    }
}

/// One page of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
    pub total: usize,
    pub results: Vec<Record>,
}

/// Invalid pagination input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page must be >= 1, got {0}")]
    InvalidPage(i64),

    #[error("perPage must be >= 1, got {0}")]
    InvalidPerPage(i64),
}

/// Returns the first record with the given id.
pub fn find_by_id(records: Vec<Record>, id: u64) -> Option<Record> {
    records.into_iter().find(|r| r.id == id)
}

/// Slices `[(page-1)*per_page, page*per_page)` out of `records`.
///
/// A start past the end yields an empty page; `total` is always the full
/// record count.
pub fn paginate(records: Vec<Record>, page: i64, per_page: i64) -> Result<Page, PageError> {
    if page < 1 {
        return Err(PageError::InvalidPage(page));
    }
    if per_page < 1 {
        return Err(PageError::InvalidPerPage(per_page));
    }
    let page = page as u64;
    let per_page = per_page as u64;

    let total = records.len();
    let start = (page - 1).saturating_mul(per_page);
    let start = usize::try_from(start).unwrap_or(usize::MAX);
    let take = usize::try_from(per_page).unwrap_or(usize::MAX);

    let results = records.into_iter().skip(start).take(take).collect();

    Ok(Page {
        page,
        per_page,
        total,
        results,
    })
}

/// Store backed by one comma-delimited file.
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    /// Creates a store for the dataset at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> Vec<Record> {
        match DatasetReader::new(&self.path).read_all() {
            Ok(DatasetContents::Records(records)) => records,
            Ok(DatasetContents::Missing) => {
                warn!(
                    event = %Event::DatasetMissing,
                    path = %self.path.display(),
                    "dataset file not found, treating as empty"
                );
                Vec::new()
            }
            Err(e) => {
                warn!(
                    event = %Event::DatasetUnreadable,
                    path = %self.path.display(),
                    code = e.code().code(),
                    error = %e,
                    "dataset unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    fn append(&self, record: &Record) -> StorageResult<()> {
        DatasetWriter::new(&self.path).append(record)
    }
}

/// In-memory store, used by tests and one-shot tooling.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordStore {
    records: Arc<Mutex<Vec<Record>>>,
    fail_writes: bool,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`, kept in the given order.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fail_writes: false,
        }
    }

    /// Create a store whose appends always fail, as a full disk would.
    pub fn failing_writes() -> Self {
        Self {
            records: Arc::default(),
            fail_writes: true,
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn append(&self, record: &Record) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::write_failed(
                format!("Failed to append record {}", record.id),
                io::Error::new(io::ErrorKind::Other, "no space left on device"),
            ));
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
