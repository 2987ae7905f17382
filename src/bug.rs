//! Bug entity, lifecycle status, and priorities.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a bug.
///
/// The only automatic transition is any status -> `InProgress` when the
/// bug is assigned; no other transition is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    Open,
    InProgress,
    Resolved,
}

impl BugStatus {
    /// Get the string representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            BugStatus::Open => "open",
            BugStatus::InProgress => "in_progress",
            BugStatus::Resolved => "resolved",
        }
    }

    /// Get all statuses
    pub fn all() -> &'static [BugStatus] {
        &[BugStatus::Open, BugStatus::InProgress, BugStatus::Resolved]
    }
}

impl Default for BugStatus {
    fn default() -> Self {
        BugStatus::Open
    }
}

impl FromStr for BugStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(BugStatus::Open),
            "in_progress" | "in-progress" | "inprogress" => Ok(BugStatus::InProgress),
            "resolved" => Ok(BugStatus::Resolved),
            _ => Err(Error::Parse(format!("Unknown bug status: {}", s))),
        }
    }
}

impl std::fmt::Display for BugStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of a bug. Reports that omit a priority default to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BugPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl BugPriority {
    /// Get the string representation of the priority
    pub fn as_str(&self) -> &'static str {
        match self {
            BugPriority::Low => "low",
            BugPriority::Medium => "medium",
            BugPriority::High => "high",
            BugPriority::Critical => "critical",
        }
    }

    /// Get all priorities
    pub fn all() -> &'static [BugPriority] {
        &[
            BugPriority::Low,
            BugPriority::Medium,
            BugPriority::High,
            BugPriority::Critical,
        ]
    }
}

impl Default for BugPriority {
    fn default() -> Self {
        BugPriority::Medium
    }
}

impl FromStr for BugPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(BugPriority::Low),
            "medium" | "med" => Ok(BugPriority::Medium),
            "high" => Ok(BugPriority::High),
            "critical" | "crit" => Ok(BugPriority::Critical),
            _ => Err(Error::Parse(format!("Unknown bug priority: {}", s))),
        }
    }
}

impl std::fmt::Display for BugPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked bug.
///
/// `updated_at` is refreshed on every mutation. `assigned_to` references a
/// user id but the referenced user is not checked for existence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub priority: BugPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_to: Option<i64>,
}

/// Fields accepted when reporting a new bug.
#[derive(Debug, Clone, Default)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub status: Option<BugStatus>,
    pub priority: Option<BugPriority>,
    pub assigned_to: Option<i64>,
}

impl NewBug {
    /// Create a report with the required fields only
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: None,
            priority: None,
            assigned_to: None,
        }
    }

    /// Set an explicit initial status
    pub fn with_status(mut self, status: BugStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set an explicit priority
    pub fn with_priority(mut self, priority: BugPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set an initial assignee
    pub fn with_assignee(mut self, user_id: i64) -> Self {
        self.assigned_to = Some(user_id);
        self
    }
}
