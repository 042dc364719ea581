//! HTTP Request Handlers
//!
//! Auth runs first (via the `Principal` extractor), then body parsing and
//! validation, then the service call.

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{HealthResponse, TaskListResponse};
use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;
use taskdesk_core::domain::validation::{
    validate_create_payload, validate_credentials, validate_task_id, validate_update_payload,
};
use taskdesk_core::domain::{Task, TaskId, ValidationError};
use taskdesk_core::port::IssuedToken;
use tracing::debug;

/// Malformed JSON is a validation failure on `body`, not a 400
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        ValidationError::field(
            "Invalid request body",
            "body",
            format!("Request body must be valid JSON: {}", e),
        )
        .into()
    })
}

/// `{id}` path segment, validated as a task id.
///
/// Undecodable segments (bad percent-encoding, invalid UTF-8) fail the same
/// way as a non-UUID id.
pub struct TaskIdPath(pub TaskId);

impl<S: Send + Sync> FromRequestParts<S> for TaskIdPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ValidationError::field("Invalid task ID", "task_id", rejection.body_text())
            })?;
        Ok(TaskIdPath(validate_task_id(&raw)?))
    }
}

/// POST /login, POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IssuedToken>, ApiError> {
    let credentials = validate_credentials(&parse_body(&body)?)?;
    let token = state.auth.authenticate(&credentials).await?;
    Ok(Json(token))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<IssuedToken>), ApiError> {
    let credentials = validate_credentials(&parse_body(&body)?)?;
    let token = state.auth.register(&credentials).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// GET /tasks
pub async fn list_tasks(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = state.tasks.list_tasks().await?;
    debug!(user = %principal.username, count = tasks.len(), "Listed tasks");
    Ok(Json(TaskListResponse { tasks }))
}

/// GET /tasks/{id}
pub async fn get_task(
    _principal: Principal,
    State(state): State<AppState>,
    TaskIdPath(id): TaskIdPath,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.get_task(&id).await?))
}

/// POST /tasks
pub async fn create_task(
    principal: Principal,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = validate_create_payload(&parse_body(&body)?)?;
    let task = state
        .tasks
        .create_task(input, &principal.username)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tasks/{id}
pub async fn update_task(
    _principal: Principal,
    State(state): State<AppState>,
    TaskIdPath(id): TaskIdPath,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let patch = validate_update_payload(&parse_body(&body)?)?;
    Ok(Json(state.tasks.update_task(&id, patch).await?))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    _principal: Principal,
    State(state): State<AppState>,
    TaskIdPath(id): TaskIdPath,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete_task(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: taskdesk_core::VERSION.to_string(),
    })
}
