//! The durable form of an accepted submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted submission, as written to the append-only log.
///
/// Raw email and age never appear here, only their digests. Once appended
/// a record is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSurveyRecord {
    /// Respondent name, copied verbatim.
    pub name: String,

    /// SHA-256 hex digest of the submitted email.
    pub email_hash: String,

    /// SHA-256 hex digest of the decimal form of the submitted age.
    pub age_hash: String,

    /// Always `true` for stored records.
    pub consent: bool,

    /// Rating from 1 to 5.
    pub rating: u8,

    /// Trimmed comments, if any were given.
    pub comments: Option<String>,

    /// Submitted user agent, or the caller's agent header.
    pub user_agent: String,

    /// Caller-supplied or derived idempotency key. Never empty.
    pub submission_id: String,

    /// When the processor accepted the submission.
    pub received_at: DateTime<Utc>,

    /// Caller address, preferring the forwarded-for header.
    pub ip: String,
}
