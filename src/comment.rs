//! Comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment attached to a bug.
///
/// Comments are append-only: once created they are never updated or
/// deleted. `bug_id` and `user_id` are stored as given without existence
/// checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub bug_id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
