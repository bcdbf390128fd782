use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::role::RoleName;

use crate::domain::types::AuditEntry;
use crate::error::ApiError;
use crate::gate::Session;
use crate::state::AppState;
use crate::usecase::rbac::{AssignRoleUseCase, ListRolesUseCase, RemoveRoleUseCase};

// ── GET /roles ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CatalogEntry {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct RoleCatalogResponse {
    pub roles: Vec<CatalogEntry>,
    pub permissions: Vec<CatalogEntry>,
}

pub async fn get_roles(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<RoleCatalogResponse>, ApiError> {
    let catalog = ListRolesUseCase {
        roles: state.role_repo(),
    }
    .execute()
    .await?;

    state
        .audit_writer()
        .record(AuditEntry::new(
            Some(session.0.user_id),
            AuditAction::View,
            AuditTargetType::System,
            None,
            Some(json!({ "catalog": "roles" })),
        ))
        .await;

    Ok(Json(RoleCatalogResponse {
        roles: catalog
            .roles
            .into_iter()
            .map(|r| CatalogEntry {
                id: r.id,
                name: r.name,
                description: r.description,
            })
            .collect(),
        permissions: catalog
            .permissions
            .into_iter()
            .map(|p| CatalogEntry {
                id: p.id,
                name: p.name,
                description: p.description,
            })
            .collect(),
    }))
}

// ── POST /roles ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RoleMembershipBody {
    pub user_id: Uuid,
    /// Closed role set; an unknown name fails deserialization before the
    /// handler runs.
    pub role: RoleName,
}

pub async fn assign_role(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RoleMembershipBody>,
) -> Result<impl IntoResponse, ApiError> {
    AssignRoleUseCase {
        roles: state.role_repo(),
        audit: state.audit_writer(),
    }
    .execute(session.0.user_id, body.user_id, body.role)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /roles ─────────────────────────────────────────────────────────────

pub async fn remove_role(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RoleMembershipBody>,
) -> Result<impl IntoResponse, ApiError> {
    RemoveRoleUseCase {
        roles: state.role_repo(),
        audit: state.audit_writer(),
    }
    .execute(session.0.user_id, body.user_id, body.role)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
