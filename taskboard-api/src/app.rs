/// Application state and router builder
///
/// # Router Layout
///
/// ```text
/// /
/// ├── /health                         # Health check (public)
/// └── /api/
///     ├── POST /register              # Public
///     ├── POST /login                 # Public
///     ├── POST /logout                # Session
///     ├── GET  /user                  # Session
///     ├── GET  /users                 # Admin
///     ├── GET  /users/role/user       # Admin/moderator
///     ├── /projects, /projects/:id    # Session, role-scoped
///     ├── /tasks, /tasks/:id          # Session, role-scoped
///     ├── GET  /analytics             # Admin
///     └── GET  /dashboard/{stats,projects,tasks}  # Session, role-scoped
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session authentication (protected routes only)
use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::auth::{middleware as auth, session};
use taskboard_shared::models::{session::Session, user::User};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request handler via Axum's `State` extractor; `Arc` keeps
/// the clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Session lifetime in seconds
    pub fn session_ttl(&self) -> i64 {
        self.config.session.ttl_seconds
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/register", post(routes::auth::register))
        .route("/api/login", post(routes::auth::login));

    // Everything else requires a valid session
    let protected_routes = Router::new()
        .route("/api/logout", post(routes::auth::logout))
        .route("/api/user", get(routes::auth::current_user))
        .route("/api/users", get(routes::users::list_users))
        .route(
            "/api/users/role/user",
            get(routes::users::list_assignable_users),
        )
        .route(
            "/api/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/projects/:id",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/api/analytics", get(routes::analytics::get_analytics))
        .route("/api/dashboard/stats", get(routes::dashboard::stats))
        .route("/api/dashboard/projects", get(routes::dashboard::projects))
        .route("/api/dashboard/tasks", get(routes::dashboard::tasks))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Resolves the `sid` cookie to a live session and its user, then injects
/// [`auth::CurrentUser`] into request extensions.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = auth::session_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let token_hash = session::hash_session_token(&token);

    let session = Session::find_valid(&state.db, &token_hash)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session expired or invalid".to_string()))?;

    let user = User::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))?;

    req.extensions_mut()
        .insert(auth::CurrentUser { user, token_hash });

    Ok(next.run(req).await)
}
