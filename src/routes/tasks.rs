/// Task CRUD endpoints
///
/// All routes in this module sit behind the bearer-token layer, which
/// rejects unauthenticated requests with 401 before any handler runs.
/// The verified user id arrives as a [`CurrentUser`] request extension,
/// and every storage operation is scoped to it: a task owned by someone
/// else answers 404, exactly like a task that does not exist.
///
/// # Endpoints
///
/// - `POST /tasks/` - Create a task
/// - `GET /tasks/` - List the caller's tasks
/// - `PUT /tasks/{id}` - Partially update a task
/// - `DELETE /tasks/{id}` - Delete a task
/// - `PATCH /tasks/{id}/done` - Mark a task as done

use crate::{
    app::AppState,
    auth::middleware::CurrentUser,
    error::{ApiError, ApiResult},
    models::{
        task::{CreateTask, Task, UpdateTask},
        user::User,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

/// Timestamp format used in list responses
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Create-task request
#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    /// Task title (required, non-empty)
    pub title: Option<String>,

    /// Task description (defaults to empty)
    pub description: Option<String>,
}

/// Update-task request; both fields optional
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title, applied only if present and non-empty
    pub title: Option<String>,

    /// New description, applied only if present and non-empty
    pub description: Option<String>,
}

/// Task fields returned from creation
#[derive(Debug, Serialize)]
pub struct CreatedTask {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Task fields returned from update and mark-done
#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_done: bool,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            is_done: task.is_done,
        }
    }
}

/// Task fields returned from list
#[derive(Debug, Serialize)]
pub struct TaskListItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_done: bool,

    /// Formatted as `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
}

/// Response carrying a confirmation message and a task
#[derive(Debug, Serialize)]
pub struct TaskResponse<T> {
    pub message: String,
    pub task: T,
}

/// Response carrying only a confirmation message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskListItem>,
}

/// Create a new task for the authenticated user
///
/// # Errors
///
/// - `400 Bad Request`: missing body or missing/empty title
/// - `404 Not Found`: the token's user record no longer exists (should not
///   occur: users are never deleted)
pub async fn add_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    body: Option<Json<AddTaskRequest>>,
) -> ApiResult<(StatusCode, Json<TaskResponse<CreatedTask>>)> {
    let Some(Json(req)) = body else {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    };

    // An empty object is indistinguishable from no body at all
    if req.title.is_none() && req.description.is_none() {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    }

    let title = match req.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(ApiError::BadRequest("Task title is required".to_string())),
    };
    let description = req.description.unwrap_or_default();

    let user = User::find_by_id(&state.db, current_user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: user.id,
            title,
            description,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully".to_string(),
            task: CreatedTask {
                id: task.id,
                title: task.title,
                description: task.description,
            },
        }),
    ))
}

/// List all tasks owned by the authenticated user
///
/// Returns an empty list when the user has no tasks.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = Task::list_by_owner(&state.db, current_user.id).await?;

    let tasks = tasks
        .iter()
        .map(|task| TaskListItem {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            is_done: task.is_done,
            created_at: task.created_at.format(CREATED_AT_FORMAT).to_string(),
        })
        .collect();

    Ok(Json(TaskListResponse { tasks }))
}

/// Partially update a task (title and/or description)
///
/// # Errors
///
/// - `400 Bad Request`: missing body
/// - `404 Not Found`: no such task owned by the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
    body: Option<Json<UpdateTaskRequest>>,
) -> ApiResult<Json<TaskResponse<TaskView>>> {
    let Some(Json(req)) = body else {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    };

    if req.title.is_none() && req.description.is_none() {
        return Err(ApiError::BadRequest("No input data provided".to_string()));
    }

    let task = Task::update(
        &state.db,
        task_id,
        current_user.id,
        UpdateTask {
            title: req.title,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully".to_string(),
        task: TaskView::from(&task),
    }))
}

/// Delete a task owned by the authenticated user
///
/// # Errors
///
/// - `404 Not Found`: no such task owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete(&state.db, task_id, current_user.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Mark a task as done
///
/// Idempotent: marking an already-done task succeeds and leaves it done.
///
/// # Errors
///
/// - `404 Not Found`: no such task owned by the caller
pub async fn mark_task_done(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<TaskResponse<TaskView>>> {
    let task = Task::mark_done(&state.db, task_id, current_user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse {
        message: "Task marked as done".to_string(),
        task: TaskView::from(&task),
    }))
}
