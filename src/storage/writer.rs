//! Dataset writer
//!
//! Append-only: rows are only ever added at the end of the file, never
//! rewritten. Each append opens the file, writes the row (preceded by the
//! header when the file is new or empty), fsyncs, and closes the handle.
//! An append is not complete until the fsync returns.
//!
//! A file whose last row lacks a line terminator is completed with `\n`
//! before the new row, so the row never joins the previous one.
//!
//! There is no locking. Two processes appending to the same file at once
//! may interleave rows.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use super::codec::encode_row;
use super::errors::{StorageError, StorageResult};
use super::record::{Record, COLUMNS};

/// Append-only writer for a dataset file.
pub struct DatasetWriter {
    path: PathBuf,
}

impl DatasetWriter {
    /// Creates a writer for the given dataset path. Does not touch the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one record with fsync enforcement.
    ///
    /// Creates parent directories and the file if missing.
    ///
    /// # Errors
    ///
    /// Returns `LEAF_STORAGE_WRITE_FAILED` if any step fails. The header and
    /// row are written with a single `write_all`.
    pub fn append(&self, record: &Record) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::write_failed(
                        format!("Failed to create dataset directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open dataset: {}", self.path.display()),
                    e,
                )
            })?;

        let len = file
            .metadata()
            .map_err(|e| StorageError::write_failed("Failed to read dataset metadata", e))?
            .len();

        let mut buffer = String::new();
        if len == 0 {
            buffer.push_str(&encode_row(&COLUMNS));
        } else if !ends_with_newline(&mut file, len)? {
            buffer.push('\n');
        }
        buffer.push_str(&encode_row(&record.to_row()));

        file.write_all(buffer.as_bytes()).map_err(|e| {
            StorageError::write_failed(format!("Failed to append record {}", record.id), e)
        })?;

        file.sync_all().map_err(|e| {
            StorageError::write_failed(
                format!("fsync failed after appending record {}", record.id),
                e,
            )
        })?;

        Ok(())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> StorageResult<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(|e| StorageError::write_failed("Failed to read dataset tail", e))?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::next_id;
    use crate::storage::reader::{DatasetContents, DatasetReader};
    use std::path::Path;
    use tempfile::TempDir;

    fn record(id: u64) -> Record {
        Record {
            id,
            image_name: format!("leaf_{}.jpg", id),
            detected_category: "sadia".to_string(),
            green_area_pixels: 100.0,
            spot_area_pixels: 0.0,
            disease_percentage: 0.0,
            recorded_at: "2024-05-01T08:00:00.000000".to_string(),
        }
    }

    fn read(path: &Path) -> Vec<Record> {
        match DatasetReader::new(path).read_all().unwrap() {
            DatasetContents::Records(r) => r,
            DatasetContents::Missing => Vec::new(),
        }
    }

    #[test]
    fn test_first_append_writes_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("folhas.csv");

        DatasetWriter::new(&path).append(&record(1)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        assert!(lines.next().unwrap().starts_with("1,leaf_1.jpg,sadia,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_header_written_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("folhas.csv");
        let writer = DatasetWriter::new(&path);

        writer.append(&record(1)).unwrap();
        writer.append(&record(2)).unwrap();
        writer.append(&record(3)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("nsu,").count(), 1);
        assert_eq!(read(&path).len(), 3);
    }

    #[test]
    fn test_zero_length_file_gets_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("folhas.csv");
        fs::write(&path, "").unwrap();

        DatasetWriter::new(&path).append(&record(1)).unwrap();

        assert_eq!(read(&path), vec![record(1)]);
    }

    #[test]
    fn test_append_after_unterminated_last_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("folhas.csv");
        fs::write(
            &path,
            format!(
                "{}\n1,a.jpg,sadia,100.0,0.0,0.0,2024-06-01T12:00:00",
                COLUMNS.join(",")
            ),
        )
        .unwrap();
        let existing = read(&path);
        assert_eq!(existing.len(), 1);

        DatasetWriter::new(&path)
            .append(&record(next_id(&existing)))
            .unwrap();

        let records = read(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], record(2));
        assert_eq!(next_id(&records), 3);
    }

    #[test]
    fn test_append_after_crlf_row_adds_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("folhas.csv");
        fs::write(
            &path,
            format!(
                "{}\r\n1,a.jpg,sadia,100.0,0.0,0.0,2024-06-01T12:00:00\r\n",
                COLUMNS.join(",")
            ),
        )
        .unwrap();

        DatasetWriter::new(&path).append(&record(2)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("\n\n"));
        assert_eq!(read(&path).len(), 2);
    }

    #[test]
    fn test_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("nested").join("folhas.csv");

        DatasetWriter::new(&path).append(&record(1)).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_append_into_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = DatasetWriter::new(temp_dir.path()).append(&record(1)).unwrap_err();
        assert_eq!(err.code().code(), "LEAF_STORAGE_WRITE_FAILED");
    }
}
