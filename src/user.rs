//! User entity and account roles.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role attached to a user account.
///
/// Roles are descriptive only: no handler enforces role-based access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Developer,
    Tester,
}

impl Role {
    /// Get the string representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
            Role::Tester => "tester",
        }
    }

    /// Get all roles
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Developer, Role::Tester]
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "developer" | "dev" => Ok(Role::Developer),
            "tester" | "qa" => Ok(Role::Tester),
            _ => Err(Error::Parse(format!("Unknown role: {}", s))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user.
///
/// Users are created explicitly, never auto-created, and there is no
/// deletion path. Email is unique across all users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in Role::all() {
            let s = role.as_str();
            let parsed: Role = s.parse().unwrap();
            assert_eq!(*role, parsed);
        }
    }

    #[test]
    fn test_role_aliases() {
        assert_eq!(Role::from_str("dev").unwrap(), Role::Developer);
        assert_eq!(Role::from_str("qa").unwrap(), Role::Tester);
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_unknown() {
        assert!(Role::from_str("manager").is_err());
    }

    #[test]
    fn test_role_json_representation() {
        assert_eq!(serde_json::to_string(&Role::Developer).unwrap(), "\"developer\"");
        let parsed: Role = serde_json::from_str("\"tester\"").unwrap();
        assert_eq!(parsed, Role::Tester);
    }
}
