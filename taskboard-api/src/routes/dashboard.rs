/// Role-scoped dashboard endpoints
///
/// # Endpoints
///
/// - `GET /api/dashboard/stats` - aggregate counts, shaped per role
/// - `GET /api/dashboard/projects` - the projects the actor works with
/// - `GET /api/dashboard/tasks` - the tasks the actor works with
///
/// Every task aggregate first drops tasks whose parent project no longer
/// exists (`visibility::valid_tasks`) - the cascade is transactional, but
/// the dashboards never trust that.
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use taskboard_shared::{
    auth::middleware::CurrentUser,
    models::{
        project::Project,
        task::Task,
        user::{Role, User},
    },
    visibility,
};

/// Dashboard stats, shaped by the actor's role
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    /// System totals for the admin
    Admin(AdminStats),

    /// Totals scoped to the moderator's managed projects
    Moderator(ModeratorStats),

    /// Totals scoped to the user's assigned tasks
    User(UserStats),
}

/// System-wide totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// All projects
    pub total_projects: usize,

    /// All tasks with a live parent project
    pub total_tasks: usize,

    /// Non-admin accounts
    pub active_users: usize,

    /// Tasks resolved or closed
    pub completed_tasks: usize,

    /// Tasks open or in progress
    pub pending_tasks: usize,
}

/// Totals over the moderator's managed projects
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorStats {
    /// Projects they manage
    pub my_projects: usize,

    /// Tasks in those projects
    pub my_tasks: usize,

    /// Managed projects still active
    pub active_projects: usize,

    /// Tasks resolved or closed
    pub completed_tasks: usize,

    /// Tasks open or in progress
    pub pending_tasks: usize,
}

/// Totals over the user's assigned tasks
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Tasks assigned to them
    pub assigned_tasks: usize,

    /// Tasks resolved or closed
    pub completed_tasks: usize,

    /// Tasks open or in progress
    pub pending_tasks: usize,

    /// Tasks currently in progress
    pub in_progress_tasks: usize,
}

/// Aggregate counts for the actor's dashboard
pub async fn stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<DashboardStats>> {
    let stats = match current.user.role {
        Role::Admin => {
            let projects = Project::list_all(&state.db).await?;
            let tasks = visibility::valid_tasks(Task::list_all(&state.db).await?, &projects);
            let users = User::list_all(&state.db).await?;

            DashboardStats::Admin(AdminStats {
                total_projects: projects.len(),
                total_tasks: tasks.len(),
                active_users: users.iter().filter(|u| u.role != Role::Admin).count(),
                completed_tasks: visibility::completed_count(&tasks),
                pending_tasks: visibility::pending_count(&tasks),
            })
        }
        Role::Moderator => {
            let projects = Project::list_by_manager(&state.db, current.user.id).await?;
            let tasks = visibility::valid_tasks(
                Task::list_by_manager(&state.db, current.user.id).await?,
                &projects,
            );

            DashboardStats::Moderator(ModeratorStats {
                my_projects: projects.len(),
                my_tasks: tasks.len(),
                active_projects: projects.iter().filter(|p| p.is_active).count(),
                completed_tasks: visibility::completed_count(&tasks),
                pending_tasks: visibility::pending_count(&tasks),
            })
        }
        Role::User => {
            let projects = Project::list_all(&state.db).await?;
            let tasks = visibility::valid_tasks(
                Task::list_by_assignee(&state.db, current.user.id).await?,
                &projects,
            );

            DashboardStats::User(UserStats {
                assigned_tasks: tasks.len(),
                completed_tasks: visibility::completed_count(&tasks),
                pending_tasks: visibility::pending_count(&tasks),
                in_progress_tasks: visibility::in_progress_count(&tasks),
            })
        }
    };

    Ok(Json(stats))
}

/// Projects for the actor's dashboard
///
/// Regular users get an empty list; their dashboard is task-centric.
pub async fn projects(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = match current.user.role {
        Role::Admin => Project::list_all(&state.db).await?,
        Role::Moderator => Project::list_by_manager(&state.db, current.user.id).await?,
        Role::User => Vec::new(),
    };

    Ok(Json(projects))
}

/// Tasks for the actor's dashboard, orphan-filtered
pub async fn tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let all_projects = Project::list_all(&state.db).await?;

    let tasks = match current.user.role {
        Role::Admin => Task::list_all(&state.db).await?,
        Role::Moderator => Task::list_by_manager(&state.db, current.user.id).await?,
        Role::User => Task::list_by_assignee(&state.db, current.user.id).await?,
    };

    Ok(Json(visibility::valid_tasks(tasks, &all_projects)))
}
