/// Task model and the resolution workflow state machine
///
/// Tasks are the unit of work inside a project. Their status walks a fixed
/// forward chain:
///
/// ```text
/// open → in_progress → resolved → closed
/// ```
///
/// - `open → in_progress`: the assignee (or the project's manager) starts
///   work. No payload.
/// - `in_progress → resolved`: the assignee resolves the task, supplying
///   `resolution_notes`. Notes are stored as given; the server does not
///   reject empty notes (client-side validation only).
/// - `resolved → closed`: the manager verifies the resolution. Closing
///   conventionally pairs with `is_verified = true`, supplied by the
///   caller rather than derived.
///
/// There is no defined backward transition. A PATCH that writes a
/// non-forward status is applied as a plain field overwrite and logged as
/// a warning by the route layer; [`TaskStatus::can_transition_to`] encodes
/// what the workflow considers legal.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('open', 'in_progress', 'resolved', 'closed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id),
///     title TEXT NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'open',
///     assigned_to_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     resolution_notes TEXT,
///     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, nobody has started work yet
    Open,

    /// The assignee is working on it
    InProgress,

    /// The assignee considers it done and has left resolution notes
    Resolved,

    /// The manager has verified the resolution
    Closed,
}

impl TaskStatus {
    /// All statuses in workflow order
    ///
    /// Aggregations iterate this so every bucket appears exactly once,
    /// including zero-count ones.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Resolved,
        TaskStatus::Closed,
    ];

    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Resolved => "resolved",
            TaskStatus::Closed => "closed",
        }
    }

    /// Checks if the task counts as completed (resolved or closed)
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Resolved | TaskStatus::Closed)
    }

    /// Checks if the task counts as pending (open or in progress)
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Open | TaskStatus::InProgress)
    }

    /// Checks if a transition to the target status follows the workflow
    ///
    /// Only the next step of the forward chain is legal; no skipping, no
    /// backward moves, nothing out of a closed task.
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        match (self, target) {
            (TaskStatus::Open, TaskStatus::InProgress) => true,
            (TaskStatus::InProgress, TaskStatus::Resolved) => true,
            (TaskStatus::Resolved, TaskStatus::Closed) => true,
            _ => false,
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Containing project
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Current workflow status
    pub status: TaskStatus,

    /// Assigned user, if any
    pub assigned_to_id: Option<Uuid>,

    /// Free-text explanation supplied when the task was resolved
    pub resolution_notes: Option<String>,

    /// Set by whoever closes the task
    pub is_verified: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Containing project, validated against the projects table by the caller
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (seeding creates tasks mid-workflow)
    pub status: TaskStatus,

    /// Assigned user, if any
    pub assigned_to_id: Option<Uuid>,
}

/// Input for a partial task update
///
/// Any subset of the mutable fields may be set; nothing chains fields
/// against each other. Double-`Option` fields distinguish "leave
/// unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use `Some(None)` to clear)
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee (use `Some(None)` to unassign)
    pub assigned_to_id: Option<Option<Uuid>>,

    /// New resolution notes (use `Some(None)` to clear)
    pub resolution_notes: Option<Option<String>>,

    /// New verification flag
    pub is_verified: Option<bool>,
}

impl UpdateTask {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assigned_to_id.is_none()
            && self.resolution_notes.is_none()
            && self.is_verified.is_none()
    }
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, status, assigned_to_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, status, assigned_to_id,
                      resolution_notes, is_verified, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.assigned_to_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assigned_to_id,
                   resolution_notes, is_verified, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assigned_to_id,
                   resolution_notes, is_verified, created_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks belonging to the given project, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assigned_to_id,
                   resolution_notes, is_verified, created_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks assigned to the given user, newest first
    pub async fn list_by_assignee(
        pool: &PgPool,
        assignee_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assigned_to_id,
                   resolution_notes, is_verified, created_at
            FROM tasks
            WHERE assigned_to_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(assignee_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks in projects managed by the given moderator, newest first
    pub async fn list_by_manager(
        pool: &PgPool,
        manager_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assigned_to_id,
                   resolution_notes, is_verified, created_at
            FROM tasks
            WHERE project_id IN (SELECT id FROM projects WHERE manager_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(manager_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Only set fields are written; last write wins. Returns the updated
    /// task, or `None` if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build dynamic update query based on which fields are present.
        // "SET id = id" keeps the comma placement uniform.
        let mut query = String::from("UPDATE tasks SET id = id");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.assigned_to_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to_id = ${}", bind_count));
        }
        if data.resolution_notes.is_some() {
            bind_count += 1;
            query.push_str(&format!(", resolution_notes = ${}", bind_count));
        }
        if data.is_verified.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_verified = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, project_id, title, description, status, \
             assigned_to_id, resolution_notes, is_verified, created_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assigned_to_id) = data.assigned_to_id {
            q = q.bind(assigned_to_id);
        }
        if let Some(resolution_notes) = data.resolution_notes {
            q = q.bind(resolution_notes);
        }
        if let Some(is_verified) = data.is_verified {
            q = q.bind(is_verified);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Returns true if the task existed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
