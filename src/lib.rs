//! # Bugtrack - Bug Tracker HTTP API
//!
//! Small CRUD service for tracking bugs, users, and comments.
//!
//! Bugtrack provides:
//! - Typed entities (User, Bug, Comment) with string-backed role/status enums
//! - SQLite-backed storage behind an explicit store handle
//! - axum HTTP handlers translating JSON requests into store calls
//! - CLI entrypoint for serving, config init, and database stats

pub mod user;
pub mod bug;
pub mod comment;
pub mod storage;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use user::{Role, User};
pub use bug::{Bug, BugPriority, BugStatus, NewBug};
pub use comment::Comment;
pub use storage::SqliteStore;

/// Result type alias for Bugtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Bugtrack operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    #[error("Bug not found: {0}")]
    BugNotFound(i64),

    #[error("Parse error: {0}")]
    Parse(String),
}
