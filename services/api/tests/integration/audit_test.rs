use chrono::{Duration, Utc};
use uuid::Uuid;

use roombook_api::domain::types::{AuditEntry, AuditFilter};
use roombook_api::usecase::audit::{AuditWriter, QueryAuditUseCase};
use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::pagination::PageQuery;

use crate::helpers::MockAuditRepo;

fn entry_at(action: AuditAction, seconds_ago: i64) -> AuditEntry {
    AuditEntry {
        created_at: Utc::now() - Duration::seconds(seconds_ago),
        ..AuditEntry::new(
            Some(Uuid::new_v4()),
            action,
            AuditTargetType::User,
            None,
            None,
        )
    }
}

#[tokio::test]
async fn should_filter_by_action_newest_first() {
    let repo = MockAuditRepo::new(vec![
        entry_at(AuditAction::Login, 30),
        entry_at(AuditAction::View, 20),
        entry_at(AuditAction::Login, 10),
        entry_at(AuditAction::Logout, 5),
    ]);

    let rows = QueryAuditUseCase { repo }
        .execute(AuditFilter {
            action: Some(AuditAction::Login),
            page: PageQuery {
                limit: 10,
                offset: 0,
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|e| e.action == AuditAction::Login));
    assert!(rows[0].created_at > rows[1].created_at, "newest first");
}

#[tokio::test]
async fn should_apply_time_window_conjunctively() {
    let repo = MockAuditRepo::new(vec![
        entry_at(AuditAction::View, 100),
        entry_at(AuditAction::View, 50),
        entry_at(AuditAction::View, 10),
    ]);

    let rows = QueryAuditUseCase { repo }
        .execute(AuditFilter {
            from: Some(Utc::now() - Duration::seconds(60)),
            to: Some(Utc::now() - Duration::seconds(20)),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn should_paginate_with_offset() {
    let entries: Vec<_> = (0..5)
        .map(|i| entry_at(AuditAction::View, i * 10))
        .collect();
    let repo = MockAuditRepo::new(entries);

    let rows = QueryAuditUseCase { repo }
        .execute(AuditFilter {
            page: PageQuery {
                limit: 2,
                offset: 2,
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    // Offset skips the two newest.
    let newest_skipped = Utc::now() - Duration::seconds(15);
    assert!(rows.iter().all(|e| e.created_at < newest_skipped));
}

#[tokio::test]
async fn should_swallow_append_failure() {
    let writer = AuditWriter {
        repo: MockAuditRepo::failing(),
    };

    // Returns unit; the only observable effect of a failure is a log line.
    writer
        .record(AuditEntry::new(
            None,
            AuditAction::View,
            AuditTargetType::System,
            None,
            None,
        ))
        .await;
}

#[tokio::test]
async fn should_record_and_read_back_details() {
    let audit = MockAuditRepo::empty();
    let writer = AuditWriter {
        repo: audit.clone(),
    };

    writer
        .record(AuditEntry::new(
            Some(Uuid::new_v4()),
            AuditAction::Create,
            AuditTargetType::Event,
            Some("evt-1".to_owned()),
            Some(serde_json::json!({ "text": "standup" })),
        ))
        .await;

    let rows = QueryAuditUseCase { repo: audit }
        .execute(AuditFilter::default())
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target_id.as_deref(), Some("evt-1"));
    assert_eq!(rows[0].details.as_ref().unwrap()["text"], "standup");
}
