use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// `GET /healthz` — liveness: the process is up and serving.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz` — readiness: the database answers a ping. Deployments use
/// this to hold traffic until the pool is actually usable.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
