use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use roombook_core::serde::to_rfc3339_ms;
use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::role::RoleName;

use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::types::AuditEntry;
use crate::error::ApiError;
use crate::gate::Session;
use crate::state::AppState;

// ── GET /users ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserListEntry {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<RoleName>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

/// Management listing of every account with its role membership. Gated by
/// `manage_users` in the router.
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<UserListEntry>>, ApiError> {
    let users = state.user_repo().list().await?;
    let role_repo = state.role_repo();

    let mut out = Vec::with_capacity(users.len());
    for user in users {
        let roles = role_repo.roles_of(user.id).await?;
        out.push(UserListEntry {
            id: user.id,
            email: user.email,
            roles,
            created_at: user.created_at,
        });
    }

    state
        .audit_writer()
        .record(AuditEntry::new(
            Some(session.0.user_id),
            AuditAction::View,
            AuditTargetType::User,
            None,
            Some(json!({ "count": out.len() })),
        ))
        .await;

    Ok(Json(out))
}
