//! Session extraction and permission gating.
//!
//! Protected routes are composed from two explicit pieces instead of wrapping
//! handlers: the [`Session`] extractor authenticates the request from the
//! session cookie, and a `require_*` middleware authorizes it against a single
//! permission. Routes that only need "signed in" use the extractor alone.

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use http::request::Parts;
use uuid::Uuid;

use roombook_domain::permission::Permission;
use roombook_session::cookie::AUTH_TOKEN;
use roombook_session::session::{SessionInfo, validate_session};

use crate::domain::repository::{AuditLogRepository, RoleRepository};
use crate::domain::types::AuditEntry;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::audit::AuditWriter;
use crate::usecase::rbac;

// ── Session extractor ────────────────────────────────────────────────────────

/// Authenticated caller, extracted from the `auth_token` cookie.
///
/// Rejects with 401 when the cookie is absent, the signature does not verify,
/// the credential is malformed, or it has expired. All failure modes collapse
/// into the same response so a probing client learns nothing.
#[derive(Debug, Clone)]
pub struct Session(pub SessionInfo);

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        // A permission gate upstream already validated the cookie and cached
        // the identity in the request extensions; reuse it instead of
        // re-validating.
        let info = parts.extensions.get::<SessionInfo>().cloned().or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(AUTH_TOKEN)
                .and_then(|c| validate_session(c.value(), &state.jwt_secret).ok())
        });

        async move { info.map(Self).ok_or(ApiError::Unauthenticated) }
    }
}

// ── CheckAccess ──────────────────────────────────────────────────────────────

pub struct CheckAccessUseCase<R: RoleRepository, A: AuditLogRepository> {
    pub roles: R,
    pub audit: AuditWriter<A>,
}

impl<R: RoleRepository, A: AuditLogRepository> CheckAccessUseCase<R, A> {
    /// Authorize `user_id` against a single permission.
    ///
    /// The lookup is fail closed. A denial leaves an audit record naming the
    /// permission and the path before the 403 is returned.
    pub async fn execute(
        &self,
        user_id: Uuid,
        permission: Permission,
        path: &str,
    ) -> Result<(), ApiError> {
        if rbac::has_permission(&self.roles, user_id, permission).await {
            return Ok(());
        }

        self.audit
            .record(AuditEntry::access_denied(user_id, permission, path))
            .await;

        Err(ApiError::Forbidden {
            required: permission,
        })
    }
}

// ── Permission middleware ────────────────────────────────────────────────────

async fn gate(
    permission: Permission,
    state: AppState,
    session: Session,
    mut req: Request,
    next: Next,
) -> Response {
    let check = CheckAccessUseCase {
        roles: state.role_repo(),
        audit: state.audit_writer(),
    };

    match check
        .execute(session.0.user_id, permission, req.uri().path())
        .await
    {
        Ok(()) => {
            req.extensions_mut().insert(session.0);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

macro_rules! require {
    ($name:ident, $permission:expr) => {
        pub async fn $name(
            State(state): State<AppState>,
            session: Session,
            req: Request,
            next: Next,
        ) -> Response {
            gate($permission, state, session, req, next).await
        }
    };
}

require!(require_view_events, Permission::ViewEvents);
require!(require_create_events, Permission::CreateEvents);
require!(require_update_events, Permission::UpdateEvents);
require!(require_delete_events, Permission::DeleteEvents);
require!(require_manage_roles, Permission::ManageRoles);
require!(require_manage_users, Permission::ManageUsers);
