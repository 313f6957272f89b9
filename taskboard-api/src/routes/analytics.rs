/// Admin analytics endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/analytics
/// ```
///
/// Returns the three chart datasets the admin view renders: project
/// counts by active/inactive, task counts per workflow status (all four
/// buckets, zeros included), and a per-non-admin-user resolved/open
/// breakdown. Tasks whose project no longer exists are excluded from
/// every dataset.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use taskboard_shared::{
    auth::middleware::CurrentUser,
    models::{project::Project, task::Task, user::User},
    policy,
    visibility::{self, StatusCount, UserTaskBreakdown},
};

/// Analytics response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    /// Projects by Active/Inactive
    pub projects_by_status: Vec<StatusCount>,

    /// Tasks per workflow status, zero buckets included
    pub tasks_by_status: Vec<StatusCount>,

    /// Per non-admin user: resolved (resolved|closed) vs open (the rest)
    pub tasks_by_user: Vec<UserTaskBreakdown>,
}

/// Computes the analytics report (admin only)
pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<AnalyticsResponse>> {
    if !policy::can_view_analytics(current.user.role) {
        return Err(ApiError::Forbidden(
            "Only admins can view analytics".to_string(),
        ));
    }

    let (all_projects, all_tasks, all_users) = tokio::try_join!(
        Project::list_all(&state.db),
        Task::list_all(&state.db),
        User::list_all(&state.db),
    )?;

    let tasks = visibility::valid_tasks(all_tasks, &all_projects);

    Ok(Json(AnalyticsResponse {
        projects_by_status: visibility::projects_by_status(&all_projects),
        tasks_by_status: visibility::tasks_by_status(&tasks),
        tasks_by_user: visibility::tasks_by_user(&all_users, &tasks),
    }))
}
