use crate::domain::repository::Mailer;
use crate::error::ApiError;

/// Mailer that records outbound messages on the structured log instead of
/// delivering them. Real delivery lives behind the `Mailer` port; deployments
/// swap in a transport without touching the issuing flow.
#[derive(Clone, Copy, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), ApiError> {
        tracing::info!(to, subject, "outbound mail");
        tracing::debug!(body = html_body, "outbound mail body");
        Ok(())
    }
}
