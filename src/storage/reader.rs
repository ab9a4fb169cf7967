//! Dataset reader
//!
//! Reads the whole dataset file in one pass and decodes every row. The file
//! handle lives only for the duration of `read_all`.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use super::codec::decode_rows;
use super::errors::{StorageError, StorageResult};
use super::record::{Record, COLUMNS};

/// Outcome of reading a dataset path.
#[derive(Debug)]
pub enum DatasetContents {
    /// No file exists at the path yet.
    Missing,
    /// The file exists and decoded cleanly (possibly with zero rows).
    Records(Vec<Record>),
}

/// Sequential reader for a dataset file.
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    /// Creates a reader for the given dataset path. Does not touch the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and decodes every record.
    ///
    /// # Errors
    ///
    /// - `LEAF_STORAGE_READ_FAILED` if the file exists but cannot be read
    /// - `LEAF_DATASET_CORRUPT` if the header or any row does not decode
    pub fn read_all(&self) -> StorageResult<DatasetContents> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(DatasetContents::Missing),
            Err(e) => {
                return Err(StorageError::read_failed(
                    format!("Failed to open dataset: {}", self.path.display()),
                    e,
                ))
            }
        };

        let mut text = String::new();
        file.read_to_string(&mut text).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to read dataset: {}", self.path.display()),
                e,
            )
        })?;

        decode_dataset(&text).map(DatasetContents::Records)
    }
}

/// Decodes dataset text: a header row followed by data rows.
///
/// Empty text decodes to an empty dataset.
pub fn decode_dataset(text: &str) -> StorageResult<Vec<Record>> {
    let rows = decode_rows(text)?;
    let mut rows = rows.into_iter();

    let header = match rows.next() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };

    let header_matches = header.cells.len() == COLUMNS.len()
        && header
            .cells
            .iter()
            .zip(COLUMNS.iter())
            .all(|(found, expected)| found.trim() == *expected);
    if !header_matches {
        return Err(StorageError::corrupt_at_line(
            header.line,
            format!("unexpected header: {}", header.cells.join(",")),
        ));
    }

    rows.map(|row| Record::from_row(&row.cells, row.line))
        .collect()
}
