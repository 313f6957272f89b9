/// API route handlers
///
/// One module per resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, current user
/// - `users`: User listing endpoints
/// - `projects`: Project CRUD
/// - `tasks`: Task CRUD and the resolution workflow
/// - `dashboard`: Role-scoped dashboard data
/// - `analytics`: Admin analytics report
use serde::{Deserialize, Deserializer};

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

/// Deserializes a nullable, omittable JSON field into `Option<Option<T>>`
///
/// Combined with `#[serde(default)]`: field absent → `None` (leave
/// unchanged), field `null` → `Some(None)` (clear), field set →
/// `Some(Some(value))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
