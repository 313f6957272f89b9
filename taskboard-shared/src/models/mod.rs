/// Database models for taskboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with a fixed role (admin, moderator, user)
/// - `project`: Projects owned by a managing moderator
/// - `task`: Tasks contained in projects, with the resolution workflow
/// - `session`: Server-side sessions backing the cookie authentication
pub mod project;
pub mod session;
pub mod task;
pub mod user;
