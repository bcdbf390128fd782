use crate::domain::repository::AuditLogRepository;
use crate::domain::types::{AuditEntry, AuditFilter};
use crate::error::ApiError;

/// Write side of the audit log.
///
/// `record` is infallible from the caller's perspective: a failed append must
/// never abort or delay the operation being audited, so repository errors are
/// reported to the operational log and swallowed.
pub struct AuditWriter<A: AuditLogRepository> {
    pub repo: A,
}

impl<A: AuditLogRepository> AuditWriter<A> {
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.repo.append(&entry).await {
            tracing::error!(
                error = %e,
                action = %entry.action,
                target_type = %entry.target_type,
                "audit write failed"
            );
        }
    }
}

/// Read side of the audit log: conjunctive filters, newest first.
pub struct QueryAuditUseCase<A: AuditLogRepository> {
    pub repo: A,
}

impl<A: AuditLogRepository> QueryAuditUseCase<A> {
    pub async fn execute(&self, filter: AuditFilter) -> Result<Vec<AuditEntry>, ApiError> {
        self.repo.query(&filter).await
    }
}
