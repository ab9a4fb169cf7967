//! Record storage for leaflog
//!
//! The dataset is one comma-delimited file: a header row, then one row per
//! record in insertion order. The file is append-only; rows are never
//! rewritten or removed by the service.
//!
//! Read paths are forgiving: a missing or malformed file loads as an empty
//! dataset. Write paths are strict: an append is acknowledged only after the
//! row is fsynced.

mod codec;
mod errors;
mod reader;
mod record;
mod store;
mod writer;

pub use codec::{decode_rows, encode_row, RawRow};
pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use reader::{decode_dataset, DatasetContents, DatasetReader};
pub use record::{NewRecord, Record, COLUMNS, RECORDED_AT_FORMAT};
pub use store::{
    find_by_id, paginate, CsvRecordStore, MemoryRecordStore, Page, PageError, RecordStore,
};
pub use writer::DatasetWriter;
