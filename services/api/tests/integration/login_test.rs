use chrono::Utc;

use roombook_api::error::{ApiError, TokenRejection};
use roombook_api::usecase::audit::AuditWriter;
use roombook_api::usecase::login::{RequestLoginInput, RequestLoginUseCase, VerifyLoginUseCase};
use roombook_domain::audit::AuditAction;
use roombook_domain::role::RoleName;

use crate::helpers::{MockAuditRepo, MockMailer, MockRoleRepo, MockUserRepo, user_with_token};

fn request_usecase(
    users: MockUserRepo,
    mailer: MockMailer,
    audit: MockAuditRepo,
) -> RequestLoginUseCase<MockUserRepo, MockMailer, MockAuditRepo> {
    RequestLoginUseCase {
        users,
        mailer,
        audit: AuditWriter { repo: audit },
        base_url: "https://booking.example.com".to_owned(),
    }
}

fn verify_usecase(
    users: MockUserRepo,
    roles: MockRoleRepo,
    audit: MockAuditRepo,
) -> VerifyLoginUseCase<MockUserRepo, MockRoleRepo, MockAuditRepo> {
    VerifyLoginUseCase {
        users,
        roles,
        audit: AuditWriter { repo: audit },
    }
}

// ── RequestLogin ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_user_and_mail_link_on_first_request() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let mailer = MockMailer::new();
    let sent_handle = mailer.sent_handle();
    let audit = MockAuditRepo::empty();
    let entries_handle = audit.entries_handle();

    request_usecase(users, mailer, audit)
        .execute(RequestLoginInput {
            email: "alice@example.com".to_owned(),
        })
        .await
        .unwrap();

    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1);
    let user = &users[0];
    assert_eq!(user.email, "alice@example.com");

    let token = user.login_token.as_deref().unwrap();
    assert_eq!(token.len(), 64, "32 random bytes, hex-encoded");
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let expires_at = user.login_token_expires_at.unwrap();
    let ttl = (expires_at - Utc::now()).num_seconds();
    assert!((595..=600).contains(&ttl), "token should live ~10 minutes, got {ttl}s");

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert!(sent[0].body.contains(&format!("/auth/verify?token={token}")));

    let entries = entries_handle.lock().unwrap();
    assert!(
        entries
            .iter()
            .any(|e| e.action == AuditAction::Create && e.user_id == Some(user.id)),
        "creation should be audited"
    );
}

#[tokio::test]
async fn should_overwrite_token_on_repeat_request() {
    let users = MockUserRepo::new(vec![user_with_token("alice@example.com", "old-token", 300)]);
    let users_handle = users.users_handle();
    let audit = MockAuditRepo::empty();
    let entries_handle = audit.entries_handle();

    request_usecase(users, MockMailer::new(), audit)
        .execute(RequestLoginInput {
            email: "alice@example.com".to_owned(),
        })
        .await
        .unwrap();

    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1, "repeat request must not create a second user");
    assert_ne!(users[0].login_token.as_deref(), Some("old-token"));

    let entries = entries_handle.lock().unwrap();
    assert!(
        entries.iter().all(|e| e.action != AuditAction::Create),
        "no user-create entry for an existing account"
    );
}

#[tokio::test]
async fn should_acknowledge_concurrent_first_requests_for_same_email() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let audit = MockAuditRepo::empty();
    let entries_handle = audit.entries_handle();
    let uc = request_usecase(users, MockMailer::new(), audit);

    let (a, b) = tokio::join!(
        uc.execute(RequestLoginInput {
            email: "alice@example.com".to_owned(),
        }),
        uc.execute(RequestLoginInput {
            email: "alice@example.com".to_owned(),
        })
    );

    // The upsert is atomic: neither request may surface a conflict error.
    assert!(a.is_ok() && b.is_ok(), "got {a:?} and {b:?}");

    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1, "one account regardless of racing requests");

    let creates = entries_handle
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.action == AuditAction::Create)
        .count();
    assert_eq!(creates, 1, "exactly one request observes the creation");
}

#[tokio::test]
async fn should_reject_empty_email() {
    let result = request_usecase(MockUserRepo::empty(), MockMailer::new(), MockAuditRepo::empty())
        .execute(RequestLoginInput {
            email: "   ".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::Validation { field: "email" })));
}

#[tokio::test]
async fn should_succeed_when_mail_delivery_fails() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();

    let result = request_usecase(users, MockMailer::failing(), MockAuditRepo::empty())
        .execute(RequestLoginInput {
            email: "alice@example.com".to_owned(),
        })
        .await;

    assert!(result.is_ok(), "mail failure must not unwind the request");
    let users = users_handle.lock().unwrap();
    assert!(users[0].login_token.is_some(), "token stays issued");
}

// ── VerifyLogin ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_and_consume_token() {
    let user = user_with_token("alice@example.com", "live-token", 60);
    let user_id = user.id;
    let users = MockUserRepo::new(vec![user]);
    let users_handle = users.users_handle();
    let roles = MockRoleRepo::new(vec![(user_id, RoleName::Student)]);
    let audit = MockAuditRepo::empty();
    let entries_handle = audit.entries_handle();

    let verified = verify_usecase(users, roles, audit)
        .execute("live-token")
        .await
        .unwrap();

    assert_eq!(verified.user.id, user_id);
    assert_eq!(verified.roles, vec![RoleName::Student]);

    let users = users_handle.lock().unwrap();
    assert!(users[0].login_token.is_none(), "token must be cleared");
    assert!(users[0].login_token_expires_at.is_none());

    let entries = entries_handle.lock().unwrap();
    let logins: Vec<_> = entries
        .iter()
        .filter(|e| e.action == AuditAction::Login)
        .collect();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].user_id, Some(user_id));
}

#[tokio::test]
async fn should_reject_second_verify_as_not_found() {
    let users = MockUserRepo::new(vec![user_with_token("alice@example.com", "live-token", 60)]);
    let uc = verify_usecase(users, MockRoleRepo::empty(), MockAuditRepo::empty());

    uc.execute("live-token").await.unwrap();
    let second = uc.execute("live-token").await;

    assert!(
        matches!(
            second,
            Err(ApiError::InvalidToken {
                reason: TokenRejection::NotFound
            })
        ),
        "consumed token leaves no trace, got {second:?}"
    );
}

#[tokio::test]
async fn should_verify_token_one_second_before_expiry() {
    let users = MockUserRepo::new(vec![user_with_token("alice@example.com", "edge-token", 1)]);
    let result = verify_usecase(users, MockRoleRepo::empty(), MockAuditRepo::empty())
        .execute("edge-token")
        .await;

    // Liveness is a strict comparison: still valid right up to the boundary.
    assert!(result.is_ok(), "got {result:?}");
}

#[tokio::test]
async fn should_classify_expired_token() {
    let users = MockUserRepo::new(vec![user_with_token("alice@example.com", "stale-token", -1)]);
    let result = verify_usecase(users, MockRoleRepo::empty(), MockAuditRepo::empty())
        .execute("stale-token")
        .await;

    assert!(matches!(
        result,
        Err(ApiError::InvalidToken {
            reason: TokenRejection::Expired
        })
    ));
}

#[tokio::test]
async fn should_reject_unknown_token_as_not_found() {
    let result = verify_usecase(MockUserRepo::empty(), MockRoleRepo::empty(), MockAuditRepo::empty())
        .execute("never-issued")
        .await;

    assert!(matches!(
        result,
        Err(ApiError::InvalidToken {
            reason: TokenRejection::NotFound
        })
    ));
}

#[tokio::test]
async fn should_allow_exactly_one_of_two_concurrent_verifies() {
    let user = user_with_token("alice@example.com", "contested-token", 60);
    let users = MockUserRepo::new(vec![user]);
    let uc = verify_usecase(users, MockRoleRepo::empty(), MockAuditRepo::empty());

    let (a, b) = tokio::join!(uc.execute("contested-token"), uc.execute("contested-token"));

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "single-use: got {a:?} and {b:?}");
}
