//! Per-field constraint checks.

use serde_json::{Map, Number, Value};
use validator::ValidateEmail;

use super::FieldError;

/// Walks the fields of a payload, collecting every violation.
///
/// Each check returns `None` when the field is invalid and records why.
pub(super) struct FieldCheck<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldCheck<'a> {
    pub(super) fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    pub(super) fn finish(self) -> Vec<FieldError> {
        self.errors
    }

    fn reject(&mut self, field: &str, msg: impl Into<String>, kind: &'static str) {
        self.errors.push(FieldError::new(field, msg, kind));
    }

    /// Look up a required field, treating `null` as missing.
    fn required(&mut self, field: &str) -> Option<&'a Value> {
        match self.fields.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, "field required", "value_error.missing");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn string(&mut self, field: &str, value: &'a Value) -> Option<&'a str> {
        if let Value::String(s) = value {
            Some(s)
        } else {
            self.reject(field, "str type expected", "type_error.str");
            None
        }
    }

    fn length(&mut self, field: &str, value: &str, min: usize, max: Option<usize>) -> bool {
        let len = value.chars().count();
        if len < min {
            self.reject(
                field,
                format!("ensure this value has at least {min} characters"),
                "value_error.any_str.min_length",
            );
            return false;
        }
        match max {
            Some(max) if len > max => {
                self.reject(
                    field,
                    format!("ensure this value has at most {max} characters"),
                    "value_error.any_str.max_length",
                );
                false
            }
            _ => true,
        }
    }

    /// A required string with a length in `min..=max` characters.
    pub(super) fn text(&mut self, field: &str, min: usize, max: usize) -> Option<String> {
        let value = self.required(field)?;
        let s = self.string(field, value)?;
        self.length(field, s, min, Some(max)).then(|| s.to_string())
    }

    /// An optional string. The outer `None` means the field was invalid.
    pub(super) fn optional_text(
        &mut self,
        field: &str,
        max: Option<usize>,
    ) -> Option<Option<String>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(value) => {
                let s = self.string(field, value)?;
                self.length(field, s, 0, max).then(|| Some(s.to_string()))
            }
        }
    }

    /// A required, syntactically valid email address with its domain
    /// lowercased. The local part keeps its case.
    pub(super) fn email(&mut self, field: &str) -> Option<String> {
        let value = self.required(field)?;
        let email = self.string(field, value)?.to_string();
        if email.validate_email() {
            Some(lowercase_domain(&email))
        } else {
            self.reject(
                field,
                "value is not a valid email address",
                "value_error.email",
            );
            None
        }
    }

    /// A required integer in `min..=max`.
    pub(super) fn bounded<T: TryFrom<i64>>(
        &mut self,
        field: &str,
        min: i64,
        max: i64,
    ) -> Option<T> {
        let value = self.required(field)?;
        let Value::Number(number) = value else {
            self.reject(field, "value is not a valid integer", "type_error.integer");
            return None;
        };
        let n = self.integer(field, number, max)?;
        if n < min {
            self.reject(
                field,
                format!("ensure this value is greater than or equal to {min}"),
                "value_error.number.not_ge",
            );
            return None;
        }
        if n > max {
            self.reject(
                field,
                format!("ensure this value is less than or equal to {max}"),
                "value_error.number.not_le",
            );
            return None;
        }
        match T::try_from(n) {
            Ok(value) => Some(value),
            Err(_) => {
                self.reject(field, "value is out of range", "value_error.number");
                None
            }
        }
    }

    fn integer(&mut self, field: &str, number: &Number, max: i64) -> Option<i64> {
        if let Some(n) = number.as_i64() {
            return Some(n);
        }
        if number.is_u64() {
            // Larger than i64::MAX, so necessarily above any bound we use.
            self.reject(
                field,
                format!("ensure this value is less than or equal to {max}"),
                "value_error.number.not_le",
            );
        } else {
            self.reject(field, "value is not a valid integer", "type_error.integer");
        }
        None
    }

    /// A required boolean that must be exactly `true`.
    pub(super) fn consent(&mut self, field: &str) -> Option<bool> {
        match self.required(field)? {
            Value::Bool(true) => Some(true),
            Value::Bool(false) => {
                self.reject(field, "consent must be true", "value_error");
                None
            }
            _ => {
                self.reject(
                    field,
                    "value could not be parsed to a boolean",
                    "type_error.bool",
                );
                None
            }
        }
    }
}

fn lowercase_domain(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
