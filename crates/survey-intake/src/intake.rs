//! The intake pipeline: validated submission in, stored record out.
//!
//! Steps run in a fixed order and the append is always last, so a failure
//! at any earlier point leaves the store untouched:
//!
//! 1. hash email and age
//! 2. resolve the user agent
//! 3. derive the idempotency key if none was supplied
//! 4. stamp `received_at` and the caller address
//! 5. append to the store

use std::net::IpAddr;
use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info};

use crate::error::IntakeError;
use crate::privacy::{derive_submission_id, hash_age, hash_email};
use crate::record::StoredSurveyRecord;
use crate::storage::RecordStore;
use crate::submission::SurveySubmission;

/// What the transport layer knows about the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Value of the `User-Agent` header.
    pub user_agent: Option<String>,
    /// Value of the `X-Forwarded-For` header.
    pub forwarded_for: Option<String>,
    /// Address of the connected peer.
    pub peer_addr: Option<IpAddr>,
}

impl RequestContext {
    /// The user agent to record when the submission carries none.
    fn agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or_default()
    }

    /// Caller address: forwarded-for if non-empty, else the peer, else empty.
    #[must_use]
    pub fn client_ip(&self) -> String {
        match self.forwarded_for.as_deref() {
            Some(forwarded) if !forwarded.is_empty() => forwarded.to_string(),
            _ => self
                .peer_addr
                .map(|addr| addr.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Turns submissions into stored records.
pub struct IntakeProcessor {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl std::fmt::Debug for IntakeProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeProcessor")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl IntakeProcessor {
    /// Create a processor that appends to `store` and reads time from `clock`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { store, clock }
    }

    /// Validate a raw body and process it.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidJson`] or [`IntakeError::Validation`]
    /// for bad input, and [`IntakeError::Internal`] if the append fails.
    pub fn submit(
        &self,
        body: &[u8],
        context: &RequestContext,
    ) -> Result<StoredSurveyRecord, IntakeError> {
        let submission = SurveySubmission::parse(body)?;
        self.process(submission, context)
    }

    /// Build the stored record for a validated submission and append it.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Internal`] if the store rejects the append.
    pub fn process(
        &self,
        submission: SurveySubmission,
        context: &RequestContext,
    ) -> Result<StoredSurveyRecord, IntakeError> {
        let record = self.build_record(submission, context);

        if let Err(err) = self.store.append(&record) {
            error!(
                error = %err,
                submission_id = %record.submission_id,
                "Failed to store survey record"
            );
            return Err(err.into());
        }

        info!(submission_id = %record.submission_id, "Stored survey record");
        Ok(record)
    }

    fn build_record(
        &self,
        submission: SurveySubmission,
        context: &RequestContext,
    ) -> StoredSurveyRecord {
        let SurveySubmission {
            name,
            email,
            age,
            consent,
            rating,
            comments,
            user_agent,
            submission_id,
        } = submission;

        let email_hash = hash_email(&email);
        let age_hash = hash_age(age);

        let user_agent = non_empty(user_agent).unwrap_or_else(|| context.agent().to_string());

        // Read once so the id's hour bucket and received_at always agree.
        let now = self.clock.utc();
        let submission_id =
            non_empty(submission_id).unwrap_or_else(|| derive_submission_id(&email_hash, now));

        StoredSurveyRecord {
            name,
            email_hash,
            age_hash,
            consent,
            rating,
            comments,
            user_agent,
            submission_id,
            received_at: now,
            ip: context.client_ip(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
