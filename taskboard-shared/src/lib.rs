//! # Taskboard Shared Library
//!
//! This crate contains the types and business logic shared by the taskboard
//! API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing and session token utilities
//! - `policy`: Role-based authorization decisions
//! - `visibility`: Role-scoped aggregation and defensive filtering
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;
pub mod policy;
pub mod visibility;

/// Current version of the taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
