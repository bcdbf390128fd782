use chrono::NaiveDate;
use uuid::Uuid;

use roombook_api::error::ApiError;
use roombook_api::usecase::audit::AuditWriter;
use roombook_api::usecase::event::{
    CreateEventInput, CreateEventUseCase, DeleteEventUseCase, ListEventsUseCase, UpdateEventInput,
    UpdateEventUseCase,
};
use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::role::RoleName;

use crate::helpers::{MockAuditRepo, MockEventRepo, MockRoleRepo, test_event};

#[tokio::test]
async fn should_list_own_events_only_without_view_all() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let events = MockEventRepo::new(vec![
        test_event(alice, "alice 1"),
        test_event(bob, "bob 1"),
        test_event(alice, "alice 2"),
    ]);

    let listed = ListEventsUseCase {
        events,
        roles: MockRoleRepo::new(vec![(alice, RoleName::Student)]),
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(alice)
    .await
    .unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|e| e.user_id == alice));
}

#[tokio::test]
async fn should_list_all_events_with_view_all() {
    let teacher = Uuid::new_v4();
    let student = Uuid::new_v4();
    let events = MockEventRepo::new(vec![
        test_event(teacher, "lecture"),
        test_event(student, "study group"),
    ]);

    let listed = ListEventsUseCase {
        events,
        roles: MockRoleRepo::new(vec![(teacher, RoleName::Teacher)]),
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(teacher)
    .await
    .unwrap();

    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn should_create_event_and_audit() {
    let user_id = Uuid::new_v4();
    let events = MockEventRepo::empty();
    let events_handle = events.events_handle();
    let audit = MockAuditRepo::empty();
    let entries = audit.entries_handle();

    let event = CreateEventUseCase {
        events,
        audit: AuditWriter { repo: audit },
    }
    .execute(
        user_id,
        CreateEventInput {
            date: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            text: "room 12 booking".to_owned(),
        },
    )
    .await
    .unwrap();

    assert_eq!(event.user_id, user_id);
    assert_eq!(events_handle.lock().unwrap().len(), 1);

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::Create);
    assert_eq!(entries[0].target_type, AuditTargetType::Event);
    assert_eq!(entries[0].target_id, Some(event.id.to_string()));
}

#[tokio::test]
async fn should_reject_blank_event_text() {
    let result = CreateEventUseCase {
        events: MockEventRepo::empty(),
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(
        Uuid::new_v4(),
        CreateEventInput {
            date: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            text: "   ".to_owned(),
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::Validation { field: "text" })));
}

#[tokio::test]
async fn should_update_event_fields() {
    let user_id = Uuid::new_v4();
    let event = test_event(user_id, "before");
    let event_id = event.id;
    let events = MockEventRepo::new(vec![event]);
    let events_handle = events.events_handle();

    UpdateEventUseCase {
        events,
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(
        user_id,
        event_id,
        UpdateEventInput {
            date: None,
            text: Some("after".to_owned()),
        },
    )
    .await
    .unwrap();

    assert_eq!(events_handle.lock().unwrap()[0].text, "after");
}

#[tokio::test]
async fn should_reject_update_without_changes() {
    let result = UpdateEventUseCase {
        events: MockEventRepo::empty(),
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(
        Uuid::new_v4(),
        Uuid::new_v4(),
        UpdateEventInput {
            date: None,
            text: None,
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::Validation { .. })));
}

#[tokio::test]
async fn should_return_not_found_for_missing_event_on_update() {
    let result = UpdateEventUseCase {
        events: MockEventRepo::empty(),
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(
        Uuid::new_v4(),
        Uuid::new_v4(),
        UpdateEventInput {
            date: NaiveDate::from_ymd_opt(2026, 10, 4),
            text: None,
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn should_delete_event_and_return_not_found_for_missing() {
    let user_id = Uuid::new_v4();
    let event = test_event(user_id, "one-off");
    let event_id = event.id;
    let events = MockEventRepo::new(vec![event]);

    let uc = DeleteEventUseCase {
        events,
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    };

    uc.execute(user_id, event_id).await.unwrap();

    let second = uc.execute(user_id, event_id).await;
    assert!(matches!(second, Err(ApiError::NotFound)));
}
