//! Append-only storage for accepted submissions.
//!
//! The intake pipeline sees storage only through [`RecordStore`], a capability
//! with a single operation: append one record. Stores never rewrite or delete
//! earlier entries.

mod jsonl;
mod memory;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::record::StoredSurveyRecord;

pub use jsonl::{read_log, JsonLinesStore};
pub use memory::MemoryStore;

#[cfg(test)]
pub(crate) use memory::FailingStore;

/// A durable, append-only sink for survey records.
///
/// Implementations must make each append atomic per record: concurrent
/// callers may not interleave bytes of two records or lose a write.
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Append one record to the end of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be durably written. The
    /// caller does not retry.
    fn append(&self, record: &StoredSurveyRecord) -> Result<()>;
}

/// Summary of what a record log currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of records in the log.
    pub total_records: usize,
    /// `received_at` of the most recently appended record.
    pub newest_record: Option<DateTime<Utc>>,
    /// Size of the log file in bytes.
    pub log_size_bytes: u64,
}

impl StoreStats {
    /// Summarise a log file without opening it for writing.
    ///
    /// A missing file yields empty stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or an entry is corrupt.
    pub fn from_log(path: &Path) -> Result<Self> {
        let records = read_log(path)?;
        let log_size_bytes = std::fs::metadata(path).map_or(0, |m| m.len());
        Ok(Self {
            total_records: records.len(),
            newest_record: records.last().map(|r| r.received_at),
            log_size_bytes,
        })
    }
}
