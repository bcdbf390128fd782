use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roombook_core::serde::{lenient_u64, to_rfc3339_ms};
use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::pagination::PageQuery;

use crate::domain::types::AuditFilter;
use crate::error::ApiError;
use crate::gate::Session;
use crate::state::AppState;
use crate::usecase::audit::QueryAuditUseCase;

// ── GET /logs ─────────────────────────────────────────────────────────────────

/// Raw query parameters. Everything is optional and lenient: unparseable
/// values fall back to the unfiltered default instead of a 400, matching how
/// a dashboard builds these URLs.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub offset: Option<u64>,
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl LogsQuery {
    fn into_filter(self) -> AuditFilter {
        let defaults = PageQuery::default();
        AuditFilter {
            action: self.action.and_then(|s| s.parse::<AuditAction>().ok()),
            target_type: self
                .target_type
                .and_then(|s| s.parse::<AuditTargetType>().ok()),
            from: self.from.and_then(parse_timestamp),
            to: self.to.and_then(parse_timestamp),
            page: PageQuery {
                limit: self.limit.unwrap_or(defaults.limit),
                offset: self.offset.unwrap_or(defaults.offset),
            }
            .clamped(),
        }
    }
}

fn parse_timestamp(s: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Serialize)]
pub struct LogEntryResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub target_type: AuditTargetType,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

pub async fn get_logs(
    State(state): State<AppState>,
    _session: Session,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<LogEntryResponse>>, ApiError> {
    let entries = QueryAuditUseCase {
        repo: state.audit_repo(),
    }
    .execute(query.into_filter())
    .await?;

    let body = entries
        .into_iter()
        .map(|e| LogEntryResponse {
            id: e.id,
            user_id: e.user_id,
            action: e.action,
            target_type: e.target_type,
            target_id: e.target_id,
            details: e.details,
            created_at: e.created_at,
        })
        .collect();

    Ok(Json(body))
}
