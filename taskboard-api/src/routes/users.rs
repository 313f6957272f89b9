/// User listing endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - every account (admin only)
/// - `GET /api/users/role/user` - regular users, for assignee pickers
///   (admin or moderator)
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, State},
    Json,
};
use taskboard_shared::{
    auth::middleware::CurrentUser,
    models::user::{Role, User},
    policy,
};

/// Lists all users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<User>>> {
    if !policy::can_list_all_users(current.user.role) {
        return Err(ApiError::Forbidden(
            "Only admins can list all users".to_string(),
        ));
    }

    let users = User::list_all(&state.db).await?;

    Ok(Json(users))
}

/// Lists regular users (role = user)
pub async fn list_assignable_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<User>>> {
    if !policy::can_list_assignable_users(current.user.role) {
        return Err(ApiError::Forbidden(
            "Only admins and moderators can list users".to_string(),
        ));
    }

    let users = User::list_by_role(&state.db, Role::User).await?;

    Ok(Json(users))
}
