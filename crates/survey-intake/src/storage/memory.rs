//! In-process record store.

use std::sync::Mutex;

use super::RecordStore;
use crate::error::{Error, Result};
use crate::record::StoredSurveyRecord;

/// Keeps appended records in memory. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredSurveyRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record appended so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<StoredSurveyRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Number of records appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map_or(0, |records| records.len())
    }

    /// Whether nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryStore {
    fn append(&self, record: &StoredSurveyRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))?
            .push(record.clone());
        Ok(())
    }
}

/// A store whose appends always fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStore;

#[cfg(test)]
impl RecordStore for FailingStore {
    fn append(&self, _record: &StoredSurveyRecord) -> Result<()> {
        Err(Error::StoreAppend {
            path: std::path::PathBuf::from("/unwritable/survey.ndjson"),
            source: std::io::Error::other("disk full"),
        })
    }
}
