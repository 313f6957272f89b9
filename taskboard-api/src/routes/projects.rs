/// Project endpoints
///
/// # Endpoints
///
/// - `GET /api/projects` - role-scoped list
/// - `POST /api/projects` - create (admin or moderator)
/// - `GET /api/projects/:id` - single project, any authenticated actor
/// - `PATCH /api/projects/:id` - update (owning moderator only)
/// - `DELETE /api/projects/:id` - delete with task cascade (owning
///   moderator only)
///
/// A moderator creating a project without an explicit `managerId` becomes
/// the manager automatically. Admins can create projects but never update
/// or delete them - that right belongs exclusively to the owning
/// moderator.
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
        project::{CreateProject, Project, UpdateProject},
        user::{Role, User},
    },
    policy,
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning moderator; defaults to the creator when they are a moderator
    pub manager_id: Option<Uuid>,

    /// Whether the project starts active (default true)
    pub is_active: Option<bool>,
}

/// Update project request - strict partial schema
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    /// New description (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New manager (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub manager_id: Option<Option<Uuid>>,

    /// New active flag
    pub is_active: Option<bool>,
}

/// Lists projects, scoped by role
///
/// Admin sees all projects, a moderator only those they manage, a regular
/// user all projects (needed to resolve project names on their tasks).
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = match current.user.role {
        Role::Admin => Project::list_all(&state.db).await?,
        Role::Moderator => Project::list_by_manager(&state.db, current.user.id).await?,
        Role::User => Project::list_all(&state.db).await?,
    };

    Ok(Json(projects))
}

/// Creates a project
pub async fn create_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    if !policy::can_create_project(current.user.role) {
        return Err(ApiError::Forbidden(
            "Only admins and moderators can create projects".to_string(),
        ));
    }

    req.validate()?;

    // Auto-assign manager if a moderator creates it without one
    let manager_id = match req.manager_id {
        Some(id) => Some(id),
        None if current.user.role == Role::Moderator => Some(current.user.id),
        None => None,
    };

    if let Some(id) = manager_id {
        ensure_manager_is_moderator(&state, id).await?;
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            manager_id,
            is_active: req.is_active.unwrap_or(true),
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Fetches a single project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Updates a project (owning moderator only)
pub async fn update_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if !policy::can_manage_project(&current.user, &project) {
        return Err(ApiError::Forbidden(
            "Only the managing moderator can update this project".to_string(),
        ));
    }

    if let Some(Some(manager_id)) = req.manager_id {
        ensure_manager_is_moderator(&state, manager_id).await?;
    }

    let updated = Project::update(
        &state.db,
        id,
        UpdateProject {
            name: req.name,
            description: req.description,
            manager_id: req.manager_id,
            is_active: req.is_active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a project and all of its tasks (owning moderator only)
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if !policy::can_manage_project(&current.user, &project) {
        return Err(ApiError::Forbidden(
            "Only the managing moderator can delete this project".to_string(),
        ));
    }

    Project::delete(&state.db, id).await?;

    tracing::info!(project_id = %id, "Project deleted with its tasks");

    Ok(Json(serde_json::json!({
        "message": "Project deleted successfully"
    })))
}

/// Verifies that a prospective manager exists and is a moderator
async fn ensure_manager_is_moderator(state: &AppState, manager_id: Uuid) -> ApiResult<()> {
    let manager = User::find_by_id(&state.db, manager_id)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest("managerId does not reference an existing user".to_string())
        })?;

    if manager.role != Role::Moderator {
        return Err(ApiError::BadRequest(
            "managerId must reference a moderator".to_string(),
        ));
    }

    Ok(())
}
