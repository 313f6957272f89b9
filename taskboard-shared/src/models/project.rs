/// Project model and database operations
///
/// Projects are owned by at most one managing moderator (`manager_id`).
/// The manager is the only actor allowed to update or delete the project;
/// creation is open to admins too (the asymmetry is deliberate, see
/// [`crate::policy`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     description TEXT,
///     manager_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning moderator (None for unmanaged admin-created projects)
    pub manager_id: Option<Uuid>,

    /// Whether the project is active
    pub is_active: bool,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning moderator, validated against the users table by the caller
    pub manager_id: Option<Uuid>,

    /// Whether the project starts active
    pub is_active: bool,
}

/// Input for a partial project update
///
/// Double-`Option` fields distinguish "leave unchanged" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description (use `Some(None)` to clear)
    pub description: Option<Option<String>>,

    /// New manager (use `Some(None)` to clear)
    pub manager_id: Option<Option<Uuid>>,

    /// New active flag
    pub is_active: Option<bool>,
}

impl UpdateProject {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.manager_id.is_none()
            && self.is_active.is_none()
    }
}

impl Project {
    /// Creates a new project
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, manager_id, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, manager_id, is_active, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.manager_id)
        .bind(data.is_active)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, manager_id, is_active, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, manager_id, is_active, created_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists projects managed by the given moderator, newest first
    pub async fn list_by_manager(
        pool: &PgPool,
        manager_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, manager_id, is_active, created_at
            FROM projects
            WHERE manager_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(manager_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Applies a partial update
    ///
    /// Only set fields are written. Returns the updated project, or `None`
    /// if the project doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build dynamic update query based on which fields are present.
        // "SET id = id" keeps the comma placement uniform.
        let mut query = String::from("UPDATE projects SET id = id");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.manager_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", manager_id = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, manager_id, is_active, created_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(manager_id) = data.manager_id {
            q = q.bind(manager_id);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project and all of its tasks in one transaction
    ///
    /// Returns true if the project existed. Tasks are removed first so a
    /// failure between the two statements rolls back rather than orphaning
    /// them.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
