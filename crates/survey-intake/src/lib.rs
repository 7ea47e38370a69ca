//! `survey-intake` - Privacy-preserving intake for survey submissions
//!
//! This library validates survey submissions, replaces direct identifiers
//! with SHA-256 digests, derives an hour-bucketed submission identifier, and
//! appends each accepted record as one JSON line to a durable log. The HTTP
//! surface lives in [`server`]; everything beneath it is usable on its own.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod intake;
pub mod logging;
pub mod privacy;
pub mod record;
pub mod server;
pub mod storage;
pub mod submission;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, IntakeError, Result};
pub use intake::{IntakeProcessor, RequestContext};
pub use logging::init_logging;
pub use record::StoredSurveyRecord;
pub use storage::{JsonLinesStore, MemoryStore, RecordStore, StoreStats};
pub use submission::{FieldError, SurveySubmission};
