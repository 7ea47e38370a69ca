//! Hour-bucketed idempotency keys.
//!
//! A derived key is the digest of the hashed email followed by the UTC hour
//! (`YYYYMMDDHH`). Resubmissions from the same address inside one UTC hour
//! therefore share a key. This is a coarse deduplication signal only: the
//! input space is small and it must not be treated as a secret or as a
//! uniqueness guarantee.

use chrono::{DateTime, Utc};

use super::digest::sha256_hex;

/// Format of the hour bucket appended to the email digest.
pub const HOUR_BUCKET_FORMAT: &str = "%Y%m%d%H";

/// The UTC hour containing `at`, e.g. `2024031714`.
#[must_use]
pub fn hour_bucket(at: DateTime<Utc>) -> String {
    at.format(HOUR_BUCKET_FORMAT).to_string()
}

/// Derive a submission id from an already hashed email.
#[must_use]
pub fn derive_submission_id(email_hash: &str, at: DateTime<Utc>) -> String {
    sha256_hex(&format!("{email_hash}{}", hour_bucket(at)))
}
