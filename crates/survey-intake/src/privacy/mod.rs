//! Privacy-preserving identifiers for stored submissions.
//!
//! - **Field digests**: email and age are replaced by SHA-256 hex digests
//!   before anything is persisted. No reverse mapping is kept anywhere.
//!
//! - **Idempotency keys**: when a caller sends no `submission_id`, one is
//!   derived from the email digest and the current UTC hour.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use survey_intake::privacy::{derive_submission_id, hash_age, hash_email, sha256_hex};
//!
//! let email_hash = hash_email("jo@example.com");
//! assert_eq!(hash_age(30), sha256_hex("30"));
//!
//! let at = Utc.with_ymd_and_hms(2024, 3, 17, 14, 30, 0).unwrap();
//! let id = derive_submission_id(&email_hash, at);
//! assert_eq!(id, sha256_hex(&format!("{email_hash}2024031714")));
//! ```

mod digest;
mod submission_id;

pub use digest::{hash_age, hash_email, sha256_hex};
pub use submission_id::{derive_submission_id, hour_bucket, HOUR_BUCKET_FORMAT};
