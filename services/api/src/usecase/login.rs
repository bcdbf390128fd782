use chrono::{Duration, Utc};
use rand::RngExt;
use serde_json::json;

use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_domain::role::RoleName;

use crate::domain::repository::{AuditLogRepository, Mailer, RoleRepository, UserRepository};
use crate::domain::types::{AuditEntry, LOGIN_TOKEN_BYTES, LOGIN_TOKEN_TTL_SECS, User};
use crate::error::{ApiError, TokenRejection};
use crate::usecase::audit::AuditWriter;

fn generate_login_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; LOGIN_TOKEN_BYTES] = rng.random();
    hex::encode(bytes)
}

// ── RequestLogin ─────────────────────────────────────────────────────────────

pub struct RequestLoginInput {
    pub email: String,
}

pub struct RequestLoginUseCase<U, M, A>
where
    U: UserRepository,
    M: Mailer,
    A: AuditLogRepository,
{
    pub users: U,
    pub mailer: M,
    pub audit: AuditWriter<A>,
    pub base_url: String,
}

impl<U, M, A> RequestLoginUseCase<U, M, A>
where
    U: UserRepository,
    M: Mailer,
    A: AuditLogRepository,
{
    /// Issue a fresh login token for the address and hand the link to the
    /// mailer. The outcome is identical for new and existing users so the
    /// endpoint gives no account-enumeration signal.
    pub async fn execute(&self, input: RequestLoginInput) -> Result<(), ApiError> {
        let email = input.email.trim();
        if email.is_empty() {
            return Err(ApiError::Validation { field: "email" });
        }

        let token = generate_login_token();
        let expires_at = Utc::now() + Duration::seconds(LOGIN_TOKEN_TTL_SECS);

        let upserted = self
            .users
            .upsert_with_login_token(email, &token, expires_at)
            .await?;

        if upserted.created {
            self.audit
                .record(AuditEntry::new(
                    Some(upserted.user.id),
                    AuditAction::Create,
                    AuditTargetType::User,
                    Some(upserted.user.id.to_string()),
                    Some(json!({ "email": upserted.user.email })),
                ))
                .await;
        }

        let verify_url = format!("{}/auth/verify?token={}", self.base_url, token);
        let body = format!(
            "<p>Use the link below to sign in.</p><p><a href=\"{verify_url}\">{verify_url}</a></p>"
        );
        // Delivery is best-effort: a mail failure never unwinds the issued token.
        if let Err(e) = self.mailer.send(email, "Your sign-in link", &body).await {
            tracing::warn!(error = %e, "login mail delivery failed");
        }

        Ok(())
    }
}

// ── VerifyLogin ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct VerifiedLogin {
    pub user: User,
    /// Role snapshot taken at this instant; embedded into the session.
    pub roles: Vec<RoleName>,
}

pub struct VerifyLoginUseCase<U, R, A>
where
    U: UserRepository,
    R: RoleRepository,
    A: AuditLogRepository,
{
    pub users: U,
    pub roles: R,
    pub audit: AuditWriter<A>,
}

impl<U, R, A> VerifyLoginUseCase<U, R, A>
where
    U: UserRepository,
    R: RoleRepository,
    A: AuditLogRepository,
{
    /// Consume a login token and return the owner with a role snapshot.
    ///
    /// The consume is one atomic conditional update; under concurrent
    /// verification of the same value at most one call gets the user back.
    pub async fn execute(&self, token: &str) -> Result<VerifiedLogin, ApiError> {
        let Some(user) = self.users.consume_login_token(token).await? else {
            return Err(ApiError::InvalidToken {
                reason: self.classify_rejection(token).await,
            });
        };

        let roles = self.roles.roles_of(user.id).await?;

        self.audit
            .record(AuditEntry::new(
                Some(user.id),
                AuditAction::Login,
                AuditTargetType::User,
                Some(user.id.to_string()),
                Some(json!({ "email": user.email })),
            ))
            .await;

        Ok(VerifiedLogin { user, roles })
    }

    /// Best-effort reason for a failed consume. Runs after the atomic attempt
    /// and only refines the error detail; it can never re-open success.
    async fn classify_rejection(&self, token: &str) -> TokenRejection {
        match self.users.find_by_login_token(token).await {
            Ok(Some(user)) if !user.has_live_token() => TokenRejection::Expired,
            _ => TokenRejection::NotFound,
        }
    }
}
