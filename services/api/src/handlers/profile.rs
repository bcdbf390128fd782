use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use roombook_core::serde::to_rfc3339_ms;
use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::role::RoleName;

use crate::domain::repository::UserRepository;
use crate::domain::types::AuditEntry;
use crate::error::ApiError;
use crate::gate::Session;
use crate::state::AppState;
use crate::usecase::rbac::RolesOfUseCase;

// ── GET /profile ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    /// Live role membership, not the snapshot frozen in the session.
    pub roles: Vec<RoleName>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .user_repo()
        .find_by_id(session.0.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let roles = RolesOfUseCase {
        roles: state.role_repo(),
    }
    .execute(user.id)
    .await?;

    state
        .audit_writer()
        .record(AuditEntry::new(
            Some(user.id),
            AuditAction::View,
            AuditTargetType::User,
            Some(user.id.to_string()),
            None,
        ))
        .await;

    Ok(Json(ProfileResponse {
        id: user.id,
        email: user.email,
        roles,
        created_at: user.created_at,
    }))
}
