/// Task endpoints
///
/// All four endpoints sit behind the bearer-token auth gate and operate
/// only on tasks owned by the authenticated caller.
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task (owner bound server-side)
/// - `GET /tasks` - List the caller's tasks ordered by position
/// - `PATCH /tasks/:id` - Partial update, including status/position moves
/// - `DELETE /tasks/:id` - Delete and return the removed task
///
/// Drag-and-drop reordering is expressed as a PATCH setting `status`
/// and/or `position` on a single task. Sibling positions are never
/// shifted; a multi-task drag is several independent PATCHes with no
/// transaction across them.

use crate::{
    app::{AppState, OwnerContext},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use uuid::Uuid;

/// Create task request body
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (required, non-empty)
    #[serde(default)]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Status column; defaults to "todo"
    pub status: Option<String>,

    /// Ordering hint; defaults to 0
    pub position: Option<i32>,
}

/// Update task request body
///
/// Any subset of the fields may be present; absent fields are untouched.
/// Ownership is not a field and cannot be reassigned.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status column
    pub status: Option<String>,

    /// New ordering hint
    pub position: Option<i32>,
}

/// Parses a status string, mapping unknown values to a validation error
fn parse_status(value: &str) -> ApiResult<TaskStatus> {
    TaskStatus::parse(value).ok_or_else(|| {
        ApiError::Validation(vec![ValidationErrorDetail {
            field: "status".to_string(),
            message: format!(
                "Status must be one of todo, in-progress, done (got \"{}\")",
                value
            ),
        }])
    })
}

/// Create a new task
///
/// The owner is taken from the authenticated context, never from the body.
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "buy milk",
///   "description": "semi-skimmed",
///   "status": "todo",
///   "position": 0
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing/empty title or status outside the enum
/// - `401 Unauthorized`: missing or invalid token
pub async fn create_task(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation(vec![ValidationErrorDetail {
            field: "title".to_string(),
            message: "Title is required".to_string(),
        }]));
    }

    let status = match req.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => TaskStatus::default(),
    };

    let task = Task::create(
        &state.db,
        owner.user_id,
        CreateTask {
            title: req.title,
            description: req.description,
            status,
            position: req.position.unwrap_or(0),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the caller's tasks
///
/// Returns every task owned by the authenticated user, sorted ascending by
/// position with creation order breaking ties.
///
/// # Endpoint
///
/// ```text
/// GET /tasks
/// Authorization: Bearer <token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, owner.user_id).await?;

    Ok(Json(tasks))
}

/// Partially update a task
///
/// # Endpoint
///
/// ```text
/// PATCH /tasks/:id
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "status": "done", "position": 2 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: status outside the enum
/// - `401 Unauthorized`: missing or invalid token
/// - `404 Not Found`: no task with this id belongs to the caller; a task
///   owned by someone else answers exactly the same way
pub async fn update_task(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let status = match req.status.as_deref() {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };

    let task = Task::update(
        &state.db,
        id,
        owner.user_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status,
            position: req.position,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
///
/// Responds with the deleted task's prior state. A second delete of the
/// same id is a 404.
///
/// # Endpoint
///
/// ```text
/// DELETE /tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid token
/// - `404 Not Found`: same ownership rule as update
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::delete(&state.db, id, owner.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}
