//! Newline-delimited JSON record log.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use super::{RecordStore, StoreStats};
use crate::error::{Error, Result};
use crate::record::StoredSurveyRecord;

/// A file of one JSON-encoded record per line, opened in append mode.
///
/// Each record is serialized into a single buffer, newline included, and
/// written with one `write_all` while the file lock is held.
#[derive(Debug)]
pub struct JsonLinesStore {
    /// Path to the log file.
    path: PathBuf,
    /// Append handle. Also held while reading back so readers never see a
    /// half-written line.
    file: Mutex<File>,
    /// Whether to `fsync` after every append.
    sync_on_append: bool,
}

impl JsonLinesStore {
    /// Open or create a record log at the given path.
    ///
    /// Creates the parent directories and file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn open(path: impl AsRef<Path>, sync_on_append: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening record log at {}", path.display());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::StoreOpen {
                path: path.clone(),
                source,
            })?;

        info!("Record log opened at {}", path.display());
        Ok(Self {
            path,
            file: Mutex::new(file),
            sync_on_append,
        })
    }

    /// Get the path to the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record currently in the log, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or an entry is corrupt.
    pub fn read_all(&self) -> Result<Vec<StoredSurveyRecord>> {
        let _guard = self
            .file
            .lock()
            .map_err(|_| Error::internal("record log lock poisoned"))?;
        read_log(&self.path)
    }

    /// Summarise the log's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or an entry is corrupt.
    pub fn stats(&self) -> Result<StoreStats> {
        let _guard = self
            .file
            .lock()
            .map_err(|_| Error::internal("record log lock poisoned"))?;
        StoreStats::from_log(&self.path)
    }
}

impl RecordStore for JsonLinesStore {
    fn append(&self, record: &StoredSurveyRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| Error::internal("record log lock poisoned"))?;

        let write = |file: &mut File| -> std::io::Result<()> {
            file.write_all(&line)?;
            file.flush()?;
            if self.sync_on_append {
                file.sync_data()?;
            }
            Ok(())
        };
        write(&mut *file).map_err(|source| Error::StoreAppend {
            path: self.path.clone(),
            source,
        })?;

        debug!(bytes = line.len(), "Appended record");
        Ok(())
    }
}

/// Read all records from a log file without opening it for writing.
///
/// A missing file reads as an empty log. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, or if any entry
/// fails to decode.
pub fn read_log(path: &Path) -> Result<Vec<StoredSurveyRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(Error::StoreOpen {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| Error::StoreCorrupt {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
