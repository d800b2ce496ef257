//! Task CRUD endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::observability::metrics;
use crate::server::AppState;
use crate::tasks::{Task, TaskCreate, TaskDraft, TaskFilter, TaskUpdate, extract_tasks};

use super::ApiError;

/// `GET /tasks`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Json<Vec<Task>> {
    metrics::record_task_op("list");
    Json(state.store.list(&filter).await)
}

/// `POST /tasks`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TaskCreate>,
) -> (StatusCode, Json<Task>) {
    metrics::record_task_op("create");
    let task = state.store.create(payload).await;
    (StatusCode::CREATED, Json(task))
}

/// `GET /tasks/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, ApiError> {
    metrics::record_task_op("get");
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Task"))
}

/// `PATCH /tasks/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    metrics::record_task_op("update");
    state
        .store
        .update(id, patch)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Task"))
}

/// `DELETE /tasks/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    metrics::record_task_op("delete");
    if state.store.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Task"))
    }
}

/// Request body for [`extract`].
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Free text to split into task drafts.
    pub text: String,
}

/// `POST /tasks/extract`
///
/// Splits free text into task drafts without persisting anything. The
/// extraction is the naive punctuation splitter, nothing smarter.
pub async fn extract(Json(payload): Json<ExtractRequest>) -> Json<Vec<TaskDraft>> {
    metrics::record_task_op("extract");
    Json(extract_tasks(&payload.text))
}
