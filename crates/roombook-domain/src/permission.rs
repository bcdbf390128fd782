//! The closed set of permissions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A capability a role can grant.
///
/// The set is closed on purpose: adding a permission means adding a variant
/// here and a seed row in the migration, and the compiler flags every match
/// that needs updating. String values are the wire/database encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewEvents,
    CreateEvents,
    UpdateEvents,
    DeleteEvents,
    ViewLogs,
    ManageUsers,
    ManageRoles,
    ViewAllEvents,
}

/// All permissions, in seed order.
pub const ALL_PERMISSIONS: [Permission; 8] = [
    Permission::ViewEvents,
    Permission::CreateEvents,
    Permission::UpdateEvents,
    Permission::DeleteEvents,
    Permission::ViewLogs,
    Permission::ManageUsers,
    Permission::ManageRoles,
    Permission::ViewAllEvents,
];

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewEvents => "view_events",
            Self::CreateEvents => "create_events",
            Self::UpdateEvents => "update_events",
            Self::DeleteEvents => "delete_events",
            Self::ViewLogs => "view_logs",
            Self::ManageUsers => "manage_users",
            Self::ManageRoles => "manage_roles",
            Self::ViewAllEvents => "view_all_events",
        }
    }

    /// Human-readable description, used for the seed rows and the management UI.
    pub fn description(self) -> &'static str {
        match self {
            Self::ViewEvents => "View own events",
            Self::CreateEvents => "Create events",
            Self::UpdateEvents => "Update events",
            Self::DeleteEvents => "Delete events",
            Self::ViewLogs => "View audit logs",
            Self::ManageUsers => "List and manage users",
            Self::ManageRoles => "Assign and remove roles",
            Self::ViewAllEvents => "View every user's events",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PERMISSIONS
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_owned()))
    }
}
