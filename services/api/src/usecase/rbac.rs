use serde_json::json;
use uuid::Uuid;

use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::permission::Permission;
use roombook_domain::role::RoleName;

use crate::domain::repository::{AuditLogRepository, RoleRepository};
use crate::domain::types::{AuditEntry, PermissionRecord, RoleRecord};
use crate::error::ApiError;
use crate::usecase::audit::AuditWriter;

// ── HasPermission ────────────────────────────────────────────────────────────

/// Membership test over the union of the user's role permissions.
///
/// Fail closed: a storage error is reported to the operational log and
/// resolves to `false`, never to "allowed".
pub async fn has_permission<R: RoleRepository>(
    roles: &R,
    user_id: Uuid,
    permission: Permission,
) -> bool {
    match roles.permissions_of(user_id).await {
        Ok(permissions) => permissions.contains(&permission),
        Err(e) => {
            tracing::error!(error = %e, %user_id, %permission, "permission lookup failed");
            false
        }
    }
}

pub struct HasPermissionUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> HasPermissionUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, permission: Permission) -> bool {
        has_permission(&self.roles, user_id, permission).await
    }
}

// ── RolesOf ──────────────────────────────────────────────────────────────────

pub struct RolesOfUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> RolesOfUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<RoleName>, ApiError> {
        self.roles.roles_of(user_id).await
    }
}

// ── AssignRole ───────────────────────────────────────────────────────────────

pub struct AssignRoleUseCase<R: RoleRepository, A: AuditLogRepository> {
    pub roles: R,
    pub audit: AuditWriter<A>,
}

impl<R: RoleRepository, A: AuditLogRepository> AssignRoleUseCase<R, A> {
    /// Idempotent: assigning an already-held role is a no-op, not an error.
    pub async fn execute(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        role: RoleName,
    ) -> Result<(), ApiError> {
        self.roles.assign_role(user_id, role).await?;
        self.audit
            .record(AuditEntry::new(
                Some(actor_id),
                AuditAction::Update,
                AuditTargetType::User,
                Some(user_id.to_string()),
                Some(json!({ "action": "role_assigned", "role": role.as_str() })),
            ))
            .await;
        Ok(())
    }
}

// ── RemoveRole ───────────────────────────────────────────────────────────────

pub struct RemoveRoleUseCase<R: RoleRepository, A: AuditLogRepository> {
    pub roles: R,
    pub audit: AuditWriter<A>,
}

impl<R: RoleRepository, A: AuditLogRepository> RemoveRoleUseCase<R, A> {
    /// Idempotent: removing an unheld role succeeds silently.
    pub async fn execute(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        role: RoleName,
    ) -> Result<(), ApiError> {
        self.roles.remove_role(user_id, role).await?;
        self.audit
            .record(AuditEntry::new(
                Some(actor_id),
                AuditAction::Delete,
                AuditTargetType::User,
                Some(user_id.to_string()),
                Some(json!({ "action": "role_removed", "role": role.as_str() })),
            ))
            .await;
        Ok(())
    }
}

// ── ListRoles ────────────────────────────────────────────────────────────────

pub struct ListRolesUseCase<R: RoleRepository> {
    pub roles: R,
}

pub struct RoleCatalog {
    pub roles: Vec<RoleRecord>,
    pub permissions: Vec<PermissionRecord>,
}

impl<R: RoleRepository> ListRolesUseCase<R> {
    pub async fn execute(&self) -> Result<RoleCatalog, ApiError> {
        Ok(RoleCatalog {
            roles: self.roles.list_roles().await?,
            permissions: self.roles.list_permissions().await?,
        })
    }
}
