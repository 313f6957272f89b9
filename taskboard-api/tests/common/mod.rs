/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - A throwaway Postgres database per test (created from DATABASE_URL,
///   dropped in cleanup) so tests can't trip over each other's data -
///   the single-admin index is global, so isolation matters here
/// - The full application router
/// - A request helper driving the router through `tower::Service`
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use sqlx::migrate::MigrateDatabase;
use sqlx::{PgPool, Postgres};
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing the app and its dedicated database
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    database_url: String,
}

impl TestContext {
    /// Creates a fresh database, runs migrations and builds the router
    ///
    /// `DATABASE_URL` must point at a reachable Postgres; the test
    /// database is created next to it with a random name.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is required for integration tests"))?;

        let (prefix, _) = base_url
            .rsplit_once('/')
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must include a database name"))?;
        let database_url = format!("{}/taskboard_test_{}", prefix, Uuid::new_v4().simple());

        Postgres::create_database(&database_url).await?;

        let db = PgPool::connect(&database_url).await?;

        // Path relative to the crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: database_url.clone(),
                max_connections: 5,
            },
            session: SessionConfig { ttl_seconds: 3600 },
            seed_demo_data: false,
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            database_url,
        })
    }

    /// Drops the test database
    pub async fn cleanup(self) -> anyhow::Result<()> {
        self.db.close().await;
        Postgres::drop_database(&self.database_url).await?;
        Ok(())
    }
}

/// Response summary: status, parsed JSON body, Set-Cookie value (if any)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
    pub set_cookie: Option<String>,
}

impl TestResponse {
    /// The session cookie pair (`sid=...`) from Set-Cookie, ready to send
    /// back in a Cookie header
    pub fn session_cookie(&self) -> String {
        self.set_cookie
            .as_ref()
            .and_then(|c| c.split(';').next())
            .expect("Response should carry a session cookie")
            .to_string()
    }

    /// The `id` field of the JSON body
    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("Response body should have an id")
            .to_string()
    }
}

/// Sends one request through the router
pub async fn send(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ctx.app.clone().call(request).await.unwrap();

    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    TestResponse {
        status,
        body,
        set_cookie,
    }
}

/// Registers an account and returns the response (201 + session cookie)
pub async fn register(
    ctx: &TestContext,
    username: &str,
    role: Option<&str>,
) -> TestResponse {
    let mut body = serde_json::json!({
        "username": username,
        "password": "password",
        "fullName": format!("{} Account", username),
    });
    if let Some(role) = role {
        body["role"] = serde_json::json!(role);
    }

    send(ctx, "POST", "/api/register", None, Some(body)).await
}
