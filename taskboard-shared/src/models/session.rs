/// Session model and database operations
///
/// Sessions back the cookie authentication: the client holds an opaque
/// token, the server stores only its SHA-256 hash together with an expiry.
/// Token generation and hashing live in [`crate::auth::session`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     token_hash VARCHAR(64) PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Session model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// SHA-256 hex of the cookie token
    pub token_hash: String,

    /// User this session authenticates
    pub user_id: Uuid,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session valid for `ttl_seconds` from now
    pub async fn create(
        pool: &PgPool,
        token_hash: &str,
        user_id: Uuid,
        ttl_seconds: i64,
    ) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, NOW() + $3 * interval '1 second')
            RETURNING token_hash, user_id, created_at, expires_at
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(ttl_seconds)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session by token hash, ignoring expired ones
    pub async fn find_valid(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token_hash, user_id, created_at, expires_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session (logout)
    ///
    /// Returns true if the session existed.
    pub async fn delete(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes expired sessions, returning how many were dropped
    ///
    /// Called once at startup; expired sessions are also rejected at
    /// lookup, so this is housekeeping, not correctness.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
