//! Record identifier (NSU) allocation
//!
//! The next identifier is derived from the tail of the dataset: the last
//! row's id plus one. This is O(1) over the loaded set and relies on rows
//! being appended in increasing id order by a single writer. If a file is
//! ever edited out of band so that the last row does not hold the largest
//! id, allocation will hand out duplicate or decreasing ids. That is the
//! contract; do not replace it with a max-scan.

use crate::storage::Record;

/// First identifier handed out on an empty dataset.
pub const FIRST_ID: u64 = 1;

/// Returns the identifier for the next record appended after `records`.
pub fn next_id(records: &[Record]) -> u64 {
    match records.last() {
        Some(last) => last.id.saturating_add(1),
        None => FIRST_ID,
    }
}
