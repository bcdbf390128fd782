use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roombook_core::serde::to_rfc3339_ms;

use crate::domain::types::Event;
use crate::error::ApiError;
use crate::gate::Session;
use crate::state::AppState;
use crate::usecase::event::{
    CreateEventInput, CreateEventUseCase, DeleteEventUseCase, ListEventsUseCase, UpdateEventInput,
    UpdateEventUseCase,
};

#[derive(Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub text: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            date: e.date,
            text: e.text,
            created_at: e.created_at,
        }
    }
}

// ── GET /events ───────────────────────────────────────────────────────────────

pub async fn get_events(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = ListEventsUseCase {
        events: state.event_repo(),
        roles: state.role_repo(),
        audit: state.audit_writer(),
    }
    .execute(session.0.user_id)
    .await?;

    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

// ── POST /events ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEventBody {
    pub date: NaiveDate,
    pub text: String,
}

pub async fn create_event(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateEventBody>,
) -> Result<impl IntoResponse, ApiError> {
    let event = CreateEventUseCase {
        events: state.event_repo(),
        audit: state.audit_writer(),
    }
    .execute(
        session.0.user_id,
        CreateEventInput {
            date: body.date,
            text: body.text,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

// ── PATCH /events/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateEventBody {
    pub date: Option<NaiveDate>,
    pub text: Option<String>,
}

pub async fn update_event(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<Uuid>,
    Json(body): Json<UpdateEventBody>,
) -> Result<impl IntoResponse, ApiError> {
    UpdateEventUseCase {
        events: state.event_repo(),
        audit: state.audit_writer(),
    }
    .execute(
        session.0.user_id,
        event_id,
        UpdateEventInput {
            date: body.date,
            text: body.text,
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /events/{id} ───────────────────────────────────────────────────────

pub async fn delete_event(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    DeleteEventUseCase {
        events: state.event_repo(),
        audit: state.audit_writer(),
    }
    .execute(session.0.user_id, event_id)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
