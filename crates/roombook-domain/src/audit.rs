//! Audit log action and target classifications.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What kind of action an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    View,
}

pub const ALL_AUDIT_ACTIONS: [AuditAction; 6] = [
    AuditAction::Create,
    AuditAction::Update,
    AuditAction::Delete,
    AuditAction::Login,
    AuditAction::Logout,
    AuditAction::View,
];

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::View => "view",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown audit action: {0}")]
pub struct UnknownAuditAction(pub String);

impl FromStr for AuditAction {
    type Err = UnknownAuditAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_AUDIT_ACTIONS
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAuditAction(s.to_owned()))
    }
}

/// What kind of object an audit entry targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditTargetType {
    Event,
    User,
    Room,
    System,
}

pub const ALL_AUDIT_TARGET_TYPES: [AuditTargetType; 4] = [
    AuditTargetType::Event,
    AuditTargetType::User,
    AuditTargetType::Room,
    AuditTargetType::System,
];

impl AuditTargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::User => "user",
            Self::Room => "room",
            Self::System => "system",
        }
    }
}

impl fmt::Display for AuditTargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown audit target type: {0}")]
pub struct UnknownAuditTargetType(pub String);

impl FromStr for AuditTargetType {
    type Err = UnknownAuditTargetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_AUDIT_TARGET_TYPES
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAuditTargetType(s.to_owned()))
    }
}
