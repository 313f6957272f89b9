/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - create an account and start a session
/// - `POST /api/login` - verify credentials and start a session
/// - `POST /api/logout` - end the current session
/// - `GET /api/user` - the currently authenticated user
///
/// Registration enforces the at-most-one-admin rule twice: a pre-check for
/// the friendly error message (the reference behavior, racy on its own)
/// and the `users_single_admin` unique index as the actual guarantee -
/// a losing racer surfaces as the same conflict via the sqlx error
/// mapping.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{middleware::CurrentUser, password, session},
    models::{
        session::Session,
        user::{CreateUser, Role, User},
    },
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Username, unique case-insensitively
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    /// Password (stored as an Argon2id hash)
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    pub full_name: String,

    /// Requested role (defaults to regular user)
    #[serde(default)]
    pub role: Role,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username (case-insensitive)
    pub username: String,

    /// Password
    pub password: String,
}

/// Register a new user
///
/// Creates the account and immediately logs it in (201 + session cookie).
///
/// # Errors
///
/// - `400 conflict`: username taken, or role is admin and an admin exists
/// - `422 validation_error`: malformed input
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    // Pre-check for the friendly message; the partial unique index is what
    // actually holds under concurrent registrations.
    if req.role == Role::Admin && User::find_by_role(&state.db, Role::Admin).await?.is_some() {
        return Err(ApiError::Conflict(
            "An admin already exists in the system".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
            role: req.role,
            full_name: req.full_name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User registered");

    let cookie = start_session(&state, &user).await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(user),
    )
        .into_response())
}

/// Login
///
/// Verifies credentials and starts a session. Username lookup is
/// case-insensitive; the response does not reveal whether the username or
/// the password was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let cookie = start_session(&state, &user).await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(user),
    )
        .into_response())
}

/// Logout
///
/// Deletes the session backing this request and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Response> {
    Session::delete(&state.db, &current.token_hash).await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Json(serde_json::json!({ "message": "Logged out" })),
    )
        .into_response())
}

/// Currently authenticated user
pub async fn current_user(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}

/// Creates a session row and returns the Set-Cookie value
async fn start_session(state: &AppState, user: &User) -> ApiResult<String> {
    let (token, token_hash) = session::generate_session_token();
    let ttl = state.session_ttl();

    Session::create(&state.db, &token_hash, user.id, ttl).await?;

    Ok(session::session_cookie(&token, ttl))
}
