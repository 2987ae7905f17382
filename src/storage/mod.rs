//! Storage layer - SQLite persistence for users, bugs, and comments

pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, SqliteStore};
