use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use roombook_domain::audit::{AuditAction, AuditTargetType};
use roombook_session::cookie::{AUTH_TOKEN, clear_session_cookie, set_session_cookie};
use roombook_session::session::{issue_session, validate_session};

use crate::domain::types::AuditEntry;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::login::{RequestLoginInput, RequestLoginUseCase, VerifyLoginUseCase};

// ── POST /auth/request ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestLoginBody {
    pub email: String,
}

#[derive(Serialize)]
pub struct RequestLoginResponse {
    pub success: bool,
}

/// Issue a magic link for the address. The response is the same whether the
/// account existed or was just created.
pub async fn request_login(
    State(state): State<AppState>,
    Json(body): Json<RequestLoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RequestLoginUseCase {
        users: state.user_repo(),
        mailer: state.mailer,
        audit: state.audit_writer(),
        base_url: state.base_url.clone(),
    };

    usecase
        .execute(RequestLoginInput { email: body.email })
        .await?;

    Ok(Json(RequestLoginResponse { success: true }))
}

// ── GET /auth/verify ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

fn login_error_redirect(error: &str) -> Redirect {
    Redirect::to(&format!("/login?error={error}"))
}

/// Magic-link landing. This is a browser navigation, so every outcome is a
/// redirect: success sets the session cookie and lands on `/`, failure lands
/// on the login page with an error code.
pub async fn verify_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<VerifyQuery>,
) -> impl IntoResponse {
    let Some(token) = query.token.filter(|t| !t.is_empty()) else {
        return (jar, login_error_redirect("no_token"));
    };

    let usecase = VerifyLoginUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        audit: state.audit_writer(),
    };

    let verified = match usecase.execute(&token).await {
        Ok(v) => v,
        Err(ApiError::InvalidToken { .. }) => return (jar, login_error_redirect("invalid")),
        Err(e) => {
            tracing::error!(error = %e, "login verification failed");
            return (jar, login_error_redirect("server"));
        }
    };

    let (session, _exp) = match issue_session(
        verified.user.id,
        &verified.user.email,
        verified.roles,
        &state.jwt_secret,
    ) {
        Ok(out) => out,
        Err(e) => {
            tracing::error!(error = %e, "session mint failed");
            return (jar, login_error_redirect("server"));
        }
    };

    let jar = set_session_cookie(jar, session, state.cookie_secure);
    (jar, Redirect::to("/"))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Clear the session cookie. Logout is attributed in the audit log only when
/// the request still carries a valid session; an anonymous or expired caller
/// gets the cookie cleared without a record.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let session = jar
        .get(AUTH_TOKEN)
        .and_then(|c| validate_session(c.value(), &state.jwt_secret).ok());

    if let Some(info) = session {
        state
            .audit_writer()
            .record(AuditEntry::new(
                Some(info.user_id),
                AuditAction::Logout,
                AuditTargetType::User,
                Some(info.user_id.to_string()),
                Some(json!({ "email": info.email })),
            ))
            .await;
    }

    let jar = clear_session_cookie(jar, state.cookie_secure);
    (jar, Json(LogoutResponse { success: true }))
}
