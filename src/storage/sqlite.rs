//! SQLite storage implementation

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::bug::{Bug, BugPriority, BugStatus, NewBug};
use crate::comment::Comment;
use crate::user::{Role, User};
use crate::{Error, Result};

use super::schema;

/// SQLite-backed storage for users, bugs, and comments
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        // FK columns are declared but intentionally not enforced (see
        // schema.rs). The bundled SQLite defaults foreign_keys on, so disable
        // it explicitly to keep references unchecked.
        self.conn.pragma_update(None, "foreign_keys", false)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== User Operations ==========

    /// Insert a new user.
    ///
    /// Fails with [`Error::DuplicateEmail`] when the email is already taken.
    pub fn create_user(&self, name: &str, email: &str, role: Role) -> Result<User> {
        self.conn
            .execute(
                "INSERT INTO users (name, email, role) VALUES (?1, ?2, ?3)",
                params![name, email, role.as_str()],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Error::DuplicateEmail(email.to_string())
                }
                other => Error::Storage(other),
            })?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        })
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, name, email, role FROM users WHERE id = ?1",
                [id],
                |row| self.row_to_user(row),
            )
            .optional()
            .map_err(Into::into)
    }

    // ========== Bug Operations ==========

    /// Insert a new bug report.
    ///
    /// Omitted status/priority fall back to open/medium. `assigned_to` is
    /// stored as given; the referenced user is not checked for existence.
    pub fn create_bug(&self, report: &NewBug) -> Result<Bug> {
        let now = Utc::now();
        let status = report.status.unwrap_or_default();
        let priority = report.priority.unwrap_or_default();

        self.conn.execute(
            r#"
            INSERT INTO bugs (title, description, status, priority, created_at, updated_at, assigned_to)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                report.title,
                report.description,
                status.as_str(),
                priority.as_str(),
                now,
                now,
                report.assigned_to,
            ],
        )?;

        Ok(Bug {
            id: self.conn.last_insert_rowid(),
            title: report.title.clone(),
            description: report.description.clone(),
            status,
            priority,
            created_at: now,
            updated_at: now,
            assigned_to: report.assigned_to,
        })
    }

    /// Get a bug by id
    pub fn get_bug(&self, id: i64) -> Result<Option<Bug>> {
        self.conn
            .query_row(
                "SELECT id, title, description, status, priority, created_at, updated_at, assigned_to FROM bugs WHERE id = ?1",
                [id],
                |row| self.row_to_bug(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List bugs, optionally filtered by exact status.
    ///
    /// Results are ordered by ascending id (insertion order).
    pub fn list_bugs(&self, status: Option<BugStatus>) -> Result<Vec<Bug>> {
        let sql = if status.is_some() {
            "SELECT id, title, description, status, priority, created_at, updated_at, assigned_to
             FROM bugs
             WHERE status = ?1
             ORDER BY id"
        } else {
            "SELECT id, title, description, status, priority, created_at, updated_at, assigned_to
             FROM bugs
             ORDER BY id"
        };

        let mut stmt = self.conn.prepare(sql)?;

        let bugs: Vec<Bug> = if let Some(s) = status {
            stmt.query_map([s.as_str()], |row| self.row_to_bug(row))?
                .filter_map(|r| r.ok())
                .collect()
        } else {
            stmt.query_map([], |row| self.row_to_bug(row))?
                .filter_map(|r| r.ok())
                .collect()
        };

        Ok(bugs)
    }

    /// Assign a bug to a user.
    ///
    /// Forces status to in_progress and refreshes updated_at. Fails with
    /// [`Error::BugNotFound`] when the id is absent, leaving no side effect.
    pub fn assign_bug(&self, id: i64, assigned_to: i64) -> Result<Bug> {
        let now = Utc::now();
        let changed = self.conn.execute(
            "UPDATE bugs SET assigned_to = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
            params![assigned_to, BugStatus::InProgress.as_str(), now, id],
        )?;

        if changed == 0 {
            return Err(Error::BugNotFound(id));
        }

        self.get_bug(id)?.ok_or(Error::BugNotFound(id))
    }

    // ========== Comment Operations ==========

    /// Insert a comment on a bug.
    ///
    /// Neither bug_id nor user_id is checked for existence.
    pub fn create_comment(&self, bug_id: i64, user_id: i64, text: &str) -> Result<Comment> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO comments (bug_id, user_id, text, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![bug_id, user_id, text, now],
        )?;

        Ok(Comment {
            id: self.conn.last_insert_rowid(),
            bug_id,
            user_id,
            text: text.to_string(),
            created_at: now,
        })
    }

    /// List comments for a bug, ordered by ascending id
    pub fn list_comments(&self, bug_id: i64) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, bug_id, user_id, text, created_at FROM comments WHERE bug_id = ?1 ORDER BY id",
        )?;

        let comments = stmt
            .query_map([bug_id], |row| self.row_to_comment(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(comments)
    }

    // ========== Statistics ==========

    /// Count all users
    pub fn count_users(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count all bugs
    pub fn count_bugs(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bugs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count all comments
    pub fn count_comments(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            users: self.count_users()?,
            bugs: self.count_bugs()?,
            comments: self.count_comments()?,
        })
    }

    // ========== Row Helpers ==========

    /// Helper to convert a row to a User
    fn row_to_user(&self, row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role_str: String = row.get(3)?;
        let role: Role = role_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role,
        })
    }

    /// Helper to convert a row to a Bug
    fn row_to_bug(&self, row: &rusqlite::Row) -> rusqlite::Result<Bug> {
        let status_str: String = row.get(3)?;
        let priority_str: String = row.get(4)?;

        let status: BugStatus = status_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let priority: BugPriority = priority_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Bug {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            status,
            priority,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
            assigned_to: row.get(7)?,
        })
    }

    /// Helper to convert a row to a Comment
    fn row_to_comment(&self, row: &rusqlite::Row) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: row.get(0)?,
            bug_id: row.get(1)?,
            user_id: row.get(2)?,
            text: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub users: usize,
    pub bugs: usize,
    pub comments: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Users: {}", self.users)?;
        writeln!(f, "  Bugs: {}", self.bugs)?;
        writeln!(f, "  Comments: {}", self.comments)
    }
}
