use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use roombook_core::middleware::request_id_layer;

use crate::gate::{
    require_create_events, require_delete_events, require_manage_roles, require_manage_users,
    require_update_events, require_view_events,
};
use crate::handlers::{
    audit::get_logs,
    auth::{logout, request_login, verify_login},
    events::{create_event, delete_event, get_events, update_event},
    health::{healthz, readyz},
    profile::get_profile,
    roles::{assign_role, get_roles, remove_role},
    users::list_users,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Each gated group carries exactly one permission middleware; the gate
    // answers 401/403 before the handler runs.
    let users = Router::new()
        .route("/users", get(list_users))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_manage_users,
        ));

    let roles = Router::new()
        .route("/roles", get(get_roles))
        .route("/roles", post(assign_role))
        .route("/roles", delete(remove_role))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_manage_roles,
        ));

    let events = Router::new()
        .route("/events", get(get_events))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_view_events,
        ))
        .merge(
            Router::new()
                .route("/events", post(create_event))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_create_events,
                )),
        )
        .merge(
            Router::new()
                .route("/events/{id}", patch(update_event))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_update_events,
                )),
        )
        .merge(
            Router::new()
                .route("/events/{id}", delete(delete_event))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_delete_events,
                )),
        );

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login token flow (anonymous)
        .route("/auth/request", post(request_login))
        .route("/auth/verify", get(verify_login))
        .route("/auth/logout", post(logout))
        // Session only (no permission gate)
        .route("/profile", get(get_profile))
        .route("/logs", get(get_logs))
        .merge(users)
        .merge(roles)
        .merge(events)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
