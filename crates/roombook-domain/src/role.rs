//! The closed set of role names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named role. Permissions attach to roles, never directly to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Admin,
    Teacher,
    Student,
}

/// All roles, in seed order.
pub const ALL_ROLES: [RoleName; 3] = [RoleName::Admin, RoleName::Teacher, RoleName::Student];

/// Role granted to every freshly created user.
pub const DEFAULT_ROLE: RoleName = RoleName::Student;

impl RoleName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Admin => "Full access including user and role management",
            Self::Teacher => "Manages events across all users",
            Self::Student => "Books and views own events",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for RoleName {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ROLES
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}
