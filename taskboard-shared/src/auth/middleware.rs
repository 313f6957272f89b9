/// Authenticated-request context
///
/// The API server's session middleware resolves the `sid` cookie to a user
/// and inserts a [`CurrentUser`] into request extensions. Handlers extract
/// it with Axum's `Extension` extractor:
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(current): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", current.user.username)
/// }
/// ```
use axum::http::{header, HeaderMap};

use super::session::token_from_cookie_header;
use crate::models::user::User;

/// Context for an authenticated request
///
/// Carries the full user row (the policy needs id and role) and the hash
/// of the session token that authenticated it (logout needs it).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The authenticated user
    pub user: User,

    /// SHA-256 hash of the session token backing this request
    pub token_hash: String,
}

/// Extracts the session token from request headers
///
/// Scans every Cookie header; browsers may send more than one.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header)
        .map(str::to_owned)
}
