use chrono::{NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::permission::Permission;

use crate::domain::repository::{AuditLogRepository, EventRepository, RoleRepository};
use crate::domain::types::{AuditEntry, Event};
use crate::error::ApiError;
use crate::usecase::audit::AuditWriter;
use crate::usecase::rbac;

// ── ListEvents ───────────────────────────────────────────────────────────────

pub struct ListEventsUseCase<E, R, A>
where
    E: EventRepository,
    R: RoleRepository,
    A: AuditLogRepository,
{
    pub events: E,
    pub roles: R,
    pub audit: AuditWriter<A>,
}

impl<E, R, A> ListEventsUseCase<E, R, A>
where
    E: EventRepository,
    R: RoleRepository,
    A: AuditLogRepository,
{
    /// Everyone sees their own events; `view_all_events` widens the scope.
    pub async fn execute(&self, actor_id: Uuid) -> Result<Vec<Event>, ApiError> {
        let view_all =
            rbac::has_permission(&self.roles, actor_id, Permission::ViewAllEvents).await;

        let events = if view_all {
            self.events.list_all().await?
        } else {
            self.events.list_for_user(actor_id).await?
        };

        self.audit
            .record(AuditEntry::new(
                Some(actor_id),
                AuditAction::View,
                AuditTargetType::Event,
                None,
                Some(json!({ "count": events.len(), "view_all": view_all })),
            ))
            .await;

        Ok(events)
    }
}

// ── CreateEvent ──────────────────────────────────────────────────────────────

pub struct CreateEventInput {
    pub date: NaiveDate,
    pub text: String,
}

pub struct CreateEventUseCase<E, A>
where
    E: EventRepository,
    A: AuditLogRepository,
{
    pub events: E,
    pub audit: AuditWriter<A>,
}

impl<E, A> CreateEventUseCase<E, A>
where
    E: EventRepository,
    A: AuditLogRepository,
{
    pub async fn execute(&self, actor_id: Uuid, input: CreateEventInput) -> Result<Event, ApiError> {
        if input.text.trim().is_empty() {
            return Err(ApiError::Validation { field: "text" });
        }

        let event = Event {
            id: Uuid::new_v4(),
            user_id: actor_id,
            date: input.date,
            text: input.text,
            created_at: Utc::now(),
        };
        self.events.create(&event).await?;

        self.audit
            .record(AuditEntry::new(
                Some(actor_id),
                AuditAction::Create,
                AuditTargetType::Event,
                Some(event.id.to_string()),
                Some(json!({ "date": event.date, "text": event.text })),
            ))
            .await;

        Ok(event)
    }
}

// ── UpdateEvent ──────────────────────────────────────────────────────────────

pub struct UpdateEventInput {
    pub date: Option<NaiveDate>,
    pub text: Option<String>,
}

pub struct UpdateEventUseCase<E, A>
where
    E: EventRepository,
    A: AuditLogRepository,
{
    pub events: E,
    pub audit: AuditWriter<A>,
}

impl<E, A> UpdateEventUseCase<E, A>
where
    E: EventRepository,
    A: AuditLogRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        event_id: Uuid,
        input: UpdateEventInput,
    ) -> Result<(), ApiError> {
        if input.date.is_none() && input.text.is_none() {
            return Err(ApiError::Validation { field: "date or text" });
        }

        let updated = self
            .events
            .update(event_id, input.date, input.text.as_deref())
            .await?;
        if !updated {
            return Err(ApiError::NotFound);
        }

        self.audit
            .record(AuditEntry::new(
                Some(actor_id),
                AuditAction::Update,
                AuditTargetType::Event,
                Some(event_id.to_string()),
                Some(json!({ "date": input.date, "text": input.text })),
            ))
            .await;

        Ok(())
    }
}

// ── DeleteEvent ──────────────────────────────────────────────────────────────

pub struct DeleteEventUseCase<E, A>
where
    E: EventRepository,
    A: AuditLogRepository,
{
    pub events: E,
    pub audit: AuditWriter<A>,
}

impl<E, A> DeleteEventUseCase<E, A>
where
    E: EventRepository,
    A: AuditLogRepository,
{
    pub async fn execute(&self, actor_id: Uuid, event_id: Uuid) -> Result<(), ApiError> {
        let deleted = self.events.delete(event_id).await?;
        if !deleted {
            return Err(ApiError::NotFound);
        }

        self.audit
            .record(AuditEntry::new(
                Some(actor_id),
                AuditAction::Delete,
                AuditTargetType::Event,
                Some(event_id.to_string()),
                None,
            ))
            .await;

        Ok(())
    }
}
