//! Request handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use super::AppState;
use crate::error::{Error, IntakeError};
use crate::intake::RequestContext;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// `GET /ping`
pub async fn ping(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "API is alive",
        "utc_time": state.clock.utc().to_rfc3339(),
    }))
}

/// `POST /v1/survey`
///
/// Runs the intake pipeline on the blocking pool and waits for the append
/// before answering.
pub async fn submit_survey(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // A non-JSON content type is treated the same as no body at all.
    let body = if has_json_content_type(&headers) {
        body
    } else {
        Bytes::new()
    };

    let context = RequestContext {
        user_agent: header_value(&headers, &header::USER_AGENT),
        forwarded_for: header_value(&headers, &X_FORWARDED_FOR),
        peer_addr: peer.map(|ConnectInfo(addr)| addr.ip()),
    };

    let processor = Arc::clone(&state.processor);
    let outcome = tokio::task::spawn_blocking(move || processor.submit(&body, &context)).await;

    match outcome {
        Ok(Ok(_record)) => (StatusCode::CREATED, Json(json!({"status": "ok"}))).into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(join_err) => {
            error!(error = %join_err, "Intake task did not complete");
            IntakeError::from(Error::internal(format!("intake task failed: {join_err}")))
                .into_response()
        }
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
