use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAuditLogRepository, DbEventRepository, DbRoleRepository, DbUserRepository,
};
use crate::infra::mail::TracingMailer;
use crate::usecase::audit::AuditWriter;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub base_url: String,
    pub cookie_secure: bool,
    pub mailer: TracingMailer,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    pub fn audit_repo(&self) -> DbAuditLogRepository {
        DbAuditLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_repo(&self) -> DbEventRepository {
        DbEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn audit_writer(&self) -> AuditWriter<DbAuditLogRepository> {
        AuditWriter {
            repo: self.audit_repo(),
        }
    }
}
