#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use roombook_domain::permission::Permission;
use roombook_domain::role::RoleName;

use crate::domain::types::{
    AuditEntry, AuditFilter, Event, PermissionRecord, RoleRecord, UpsertedUser, User,
};
use crate::error::ApiError;

/// Repository for user accounts and their login-token fields.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Upsert a user by email and install a fresh login token, overwriting
    /// any prior token state. On creation the default role is granted in the
    /// same transaction.
    async fn upsert_with_login_token(
        &self,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<UpsertedUser, ApiError>;

    /// Atomically consume a live login token: clear the token fields where
    /// the token matches and has not expired, returning the owning user.
    /// `None` means no live token matched — the sole synchronization point
    /// for the single-use guarantee, never a read followed by a write.
    async fn consume_login_token(&self, token: &str) -> Result<Option<User>, ApiError>;

    /// Non-mutating lookup by token value regardless of expiry. Used only to
    /// classify a failed consume (expired vs. unknown).
    async fn find_by_login_token(&self, token: &str) -> Result<Option<User>, ApiError>;

    async fn list(&self) -> Result<Vec<User>, ApiError>;
}

/// Repository for role membership and the role→permission grant matrix.
pub trait RoleRepository: Send + Sync {
    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<RoleName>, ApiError>;

    /// Union of permissions across every role the user holds.
    async fn permissions_of(&self, user_id: Uuid) -> Result<Vec<Permission>, ApiError>;

    /// Idempotent: assigning an already-held role is a no-op.
    async fn assign_role(&self, user_id: Uuid, role: RoleName) -> Result<(), ApiError>;

    /// Idempotent: removing an unheld role succeeds silently.
    async fn remove_role(&self, user_id: Uuid, role: RoleName) -> Result<(), ApiError>;

    async fn list_roles(&self) -> Result<Vec<RoleRecord>, ApiError>;

    async fn list_permissions(&self) -> Result<Vec<PermissionRecord>, ApiError>;
}

/// Append-only store of audit entries. Rows are never updated or deleted.
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), ApiError>;

    /// Newest-first, paginated, all filters conjunctive.
    async fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, ApiError>;
}

/// Repository for booking events.
pub trait EventRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Event>, ApiError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ApiError>;

    async fn create(&self, event: &Event) -> Result<(), ApiError>;

    /// Returns `true` if a row was updated, `false` if not found.
    async fn update(
        &self,
        id: Uuid,
        date: Option<NaiveDate>,
        text: Option<&str>,
    ) -> Result<bool, ApiError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Outbound email capability. Delivery failures are non-fatal to callers;
/// the issuing flow logs and continues.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), ApiError>;
}
