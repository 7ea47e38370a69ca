//! Error types for survey-intake.
//!
//! Two layers live here: [`Error`] covers operational failures (storage,
//! configuration, I/O) and [`IntakeError`] describes the outcome of a single
//! submission as seen by the caller.

use std::path::PathBuf;
use thiserror::Error;

use crate::submission::FieldError;

/// The main error type for survey-intake operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Appending a record to the log failed.
    #[error("failed to append record to {path}: {source}")]
    StoreAppend {
        /// Path to the record log.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to open the record log.
    #[error("failed to open record log at {path}: {source}")]
    StoreOpen {
        /// Path to the record log.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A stored entry could not be decoded.
    #[error("corrupt entry at line {line} of {path}: {source}")]
    StoreCorrupt {
        /// Path to the record log.
        path: PathBuf,
        /// 1-based line number of the entry.
        line: usize,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for survey-intake operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}

/// Why a submission was not accepted.
///
/// The variants map one-to-one onto the HTTP response contract: client
/// errors (`InvalidJson`, `Validation`) and server errors (`Internal`).
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The body was absent, empty, or not JSON.
    #[error("body must be application/json")]
    InvalidJson,

    /// One or more fields violated their constraints.
    #[error("submission failed validation on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Anonymization, derivation, or storage failed.
    #[error("{0}")]
    Internal(#[from] Error),
}
