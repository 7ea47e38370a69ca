//! Mapping intake failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::IntakeError;

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidJson => (
                StatusCode::BAD_REQUEST,
                json!({"error": "invalid_json", "detail": "Body must be application/json"}),
            ),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": "validation_error", "detail": errors}),
            ),
            Self::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "request_failed", "detail": err.to_string()}),
            ),
        };
        (status, Json(body)).into_response()
    }
}
