use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::pagination::PageQuery;
use roombook_domain::permission::Permission;

/// User account. Created on first login request (upsert by email); immutable
/// afterwards except for the login-token fields.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub login_token: Option<String>,
    pub login_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// True while the stored login token exists and has not expired.
    pub fn has_live_token(&self) -> bool {
        match (&self.login_token, self.login_token_expires_at) {
            (Some(_), Some(expires_at)) => expires_at > Utc::now(),
            _ => false,
        }
    }
}

/// Result of upserting a user at token-request time.
#[derive(Debug, Clone)]
pub struct UpsertedUser {
    pub user: User,
    /// True when the row was created by this upsert (triggers the default
    /// role grant and a user-create audit entry).
    pub created: bool,
}

/// One immutable audit record.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub target_type: AuditTargetType,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        user_id: Option<Uuid>,
        action: AuditAction,
        target_type: AuditTargetType,
        target_id: Option<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            action,
            target_type,
            target_id,
            details,
            created_at: Utc::now(),
        }
    }

    /// Entry written when the access gate denies a request.
    pub fn access_denied(user_id: Uuid, required: Permission, path: &str) -> Self {
        Self::new(
            Some(user_id),
            AuditAction::View,
            AuditTargetType::System,
            None,
            Some(serde_json::json!({
                "message": "access denied",
                "required_permission": required.as_str(),
                "path": path,
            })),
        )
    }
}

/// Conjunctive filters for reading the audit log. Absent filters are
/// unconstrained; results are newest-first.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub action: Option<AuditAction>,
    pub target_type: Option<AuditTargetType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: PageQuery,
}

/// Booking event.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Role row as listed on the management surface.
#[derive(Debug, Clone)]
pub struct RoleRecord {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// Permission row as listed on the management surface.
#[derive(Debug, Clone)]
pub struct PermissionRecord {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// Login token time-to-live in seconds (10 minutes).
pub const LOGIN_TOKEN_TTL_SECS: i64 = 600;

/// Login token entropy in bytes (256 bits, hex-encoded on the wire).
pub const LOGIN_TOKEN_BYTES: usize = 32;
