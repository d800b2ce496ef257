//! HTTP request handlers.
//!
//! Thin translation between the wire and the engine/store: handlers
//! validate input, call the underlying operation, and return JSON. The
//! engine itself never fails, so the only API errors are unknown task
//! ids and rejected configuration patches.

pub mod tasks;
pub mod timer;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::ValidationIssue;

/// API-level error, rendered as `{"detail": …}` like the error body of
/// the original service.
#[derive(Debug)]
pub enum ApiError {
    /// Entity lookup failed (404).
    NotFound(&'static str),
    /// Request payload failed validation (422).
    Validation(Vec<ValidationIssue>),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::Validation(issues) => {
                let detail = issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                (StatusCode::UNPROCESSABLE_ENTITY, detail)
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /`
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "pomod: TODO + Pomodoro timer API" }))
}
