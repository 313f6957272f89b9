/// Task endpoints and the resolution workflow
///
/// # Endpoints
///
/// - `GET /api/tasks` - role-scoped list
/// - `POST /api/tasks` - create (admin or moderator)
/// - `PATCH /api/tasks/:id` - partial update (assignee or managing
///   moderator)
/// - `DELETE /api/tasks/:id` - delete (assignee or managing moderator)
///
/// The PATCH body is a strict partial schema over the mutable fields; any
/// subset may be updated in one call, and no field is validated against
/// another - resolving with empty notes or closing without `isVerified`
/// is accepted. A status write that doesn't follow the forward workflow
/// (`open → in_progress → resolved → closed`) is applied as a plain
/// overwrite and logged as a warning.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::double_option,
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::middleware::CurrentUser,
    models::{
        project::Project,
        task::{CreateTask, Task, TaskStatus, UpdateTask},
        user::{Role, User},
    },
    policy,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Containing project
    pub project_id: Uuid,

    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (default open)
    pub status: Option<TaskStatus>,

    /// Assigned user, if any
    pub assigned_to_id: Option<Uuid>,
}

/// Update task request - strict partial schema
///
/// Unknown fields are rejected before anything reaches the store.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New description (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee (null unassigns)
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to_id: Option<Option<Uuid>>,

    /// New resolution notes (null clears them)
    #[serde(default, deserialize_with = "double_option")]
    pub resolution_notes: Option<Option<String>>,

    /// New verification flag
    pub is_verified: Option<bool>,
}

/// Lists tasks, scoped by role
///
/// Admin sees every task, a moderator the tasks of projects they manage,
/// a regular user only tasks assigned to them.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = match current.user.role {
        Role::Admin => Task::list_all(&state.db).await?,
        Role::Moderator => Task::list_by_manager(&state.db, current.user.id).await?,
        Role::User => Task::list_by_assignee(&state.db, current.user.id).await?,
    };

    Ok(Json(tasks))
}

/// Creates a task
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    if !policy::can_create_task(current.user.role) {
        return Err(ApiError::Forbidden(
            "Only admins and moderators can create tasks".to_string(),
        ));
    }

    req.validate()?;

    if Project::find_by_id(&state.db, req.project_id)
        .await?
        .is_none()
    {
        return Err(ApiError::BadRequest(
            "projectId does not reference an existing project".to_string(),
        ));
    }

    if let Some(assignee_id) = req.assigned_to_id {
        if User::find_by_id(&state.db, assignee_id).await?.is_none() {
            return Err(ApiError::BadRequest(
                "assignedToId does not reference an existing user".to_string(),
            ));
        }
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id: req.project_id,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or(TaskStatus::Open),
            assigned_to_id: req.assigned_to_id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, project_id = %task.project_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Applies a partial update to a task
///
/// Authorized for the assignee or the moderator managing the task's
/// project; nobody else, admins included. Last write wins on concurrent
/// updates.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = Project::find_by_id(&state.db, task.project_id).await?;

    if !policy::can_modify_task(&current.user, &task, project.as_ref()) {
        return Err(ApiError::Forbidden(
            "Only the assignee or the project manager can update this task".to_string(),
        ));
    }

    if let Some(new_status) = req.status {
        if new_status != task.status && !task.status.can_transition_to(new_status) {
            tracing::warn!(
                task_id = %task.id,
                from = task.status.as_str(),
                to = new_status.as_str(),
                "Task status overwritten outside the forward workflow"
            );
        }
    }

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assigned_to_id: req.assigned_to_id,
            resolution_notes: req.resolution_notes,
            is_verified: req.is_verified,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a task
///
/// Same authorization rule as updates.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = Project::find_by_id(&state.db, task.project_id).await?;

    if !policy::can_modify_task(&current.user, &task, project.as_ref()) {
        return Err(ApiError::Forbidden(
            "Only the assignee or the project manager can delete this task".to_string(),
        ));
    }

    Task::delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({
        "message": "Task deleted successfully"
    })))
}
