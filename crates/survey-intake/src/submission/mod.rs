//! Inbound survey submissions and their validation.
//!
//! A [`SurveySubmission`] only exists once every field has been checked.
//! [`SurveySubmission::parse`] inspects the whole payload before returning,
//! so a rejected body reports all of its violations at once and nothing
//! downstream ever sees a partially valid submission.

mod rules;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, IntakeError};
use rules::FieldCheck;

/// Field name reported when the body itself has the wrong shape.
pub const ROOT_FIELD: &str = "__root__";

/// Bounds for `name`, in characters.
pub const NAME_LENGTH: (usize, usize) = (1, 100);

/// Bounds for `age`, inclusive.
pub const AGE_RANGE: (i64, i64) = (13, 120);

/// Bounds for `rating`, inclusive.
pub const RATING_RANGE: (i64, i64) = (1, 5);

/// Maximum length of `comments`, in characters.
pub const COMMENTS_MAX_LENGTH: usize = 1000;

/// A validated survey submission.
///
/// Lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySubmission {
    /// Respondent name, 1 to 100 characters.
    pub name: String,
    /// Respondent email as submitted. Only its digest is ever stored.
    pub email: String,
    /// Respondent age, 13 to 120.
    pub age: u8,
    /// Always `true` on a validated submission.
    pub consent: bool,
    /// Rating from 1 to 5.
    pub rating: u8,
    /// Free-text comments with surrounding whitespace removed.
    pub comments: Option<String>,
    /// Caller-supplied user agent.
    pub user_agent: Option<String>,
    /// Caller-supplied idempotency key.
    pub submission_id: Option<String>,
}

/// A single field constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Location of the offending field.
    pub loc: Vec<String>,
    /// Human-readable description.
    pub msg: String,
    /// Machine-readable violation code.
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    /// Create a violation for the named field.
    #[must_use]
    pub fn new(field: &str, msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: vec![field.to_string()],
            msg: msg.into(),
            kind,
        }
    }

    /// The field this violation refers to.
    #[must_use]
    pub fn field(&self) -> &str {
        self.loc.first().map_or("", String::as_str)
    }
}

impl SurveySubmission {
    /// Parse and validate a raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidJson`] if the body is empty, not JSON,
    /// or the JSON `null`, and [`IntakeError::Validation`] carrying one
    /// entry per violated field otherwise.
    pub fn parse(body: &[u8]) -> Result<Self, IntakeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(IntakeError::InvalidJson);
        }

        let payload: Value = serde_json::from_slice(body).map_err(|err| {
            debug!(error = %err, "Rejected non-JSON body");
            IntakeError::InvalidJson
        })?;

        Self::from_value(&payload)
    }

    /// Validate an already decoded JSON payload.
    ///
    /// # Errors
    ///
    /// See [`SurveySubmission::parse`].
    pub fn from_value(payload: &Value) -> Result<Self, IntakeError> {
        let fields = match payload {
            Value::Null => return Err(IntakeError::InvalidJson),
            Value::Object(fields) => fields,
            _ => {
                return Err(IntakeError::Validation(vec![FieldError::new(
                    ROOT_FIELD,
                    "value is not a valid dict",
                    "type_error.dict",
                )]))
            }
        };

        let mut check = FieldCheck::new(fields);
        let name = check.text("name", NAME_LENGTH.0, NAME_LENGTH.1);
        let email = check.email("email");
        let age = check.bounded::<u8>("age", AGE_RANGE.0, AGE_RANGE.1);
        let consent = check.consent("consent");
        let rating = check.bounded::<u8>("rating", RATING_RANGE.0, RATING_RANGE.1);
        let comments = check.optional_text("comments", Some(COMMENTS_MAX_LENGTH));
        let user_agent = check.optional_text("user_agent", None);
        let submission_id = check.optional_text("submission_id", None);

        let errors = check.finish();
        if !errors.is_empty() {
            debug!(violations = errors.len(), "Rejected invalid submission");
            return Err(IntakeError::Validation(errors));
        }

        match (
            name,
            email,
            age,
            consent,
            rating,
            comments,
            user_agent,
            submission_id,
        ) {
            (
                Some(name),
                Some(email),
                Some(age),
                Some(consent),
                Some(rating),
                Some(comments),
                Some(user_agent),
                Some(submission_id),
            ) => Ok(Self {
                name,
                email,
                age,
                consent,
                rating,
                comments: comments.map(|c| c.trim().to_string()),
                user_agent,
                submission_id,
            }),
            // Every check that yields `None` records a violation, so an
            // empty error list with a missing value is a bug, not bad input.
            _ => Err(IntakeError::Internal(Error::internal(
                "validated submission is missing a field",
            ))),
        }
    }
}
