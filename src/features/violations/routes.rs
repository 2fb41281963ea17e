use axum::{
    routing::{get, post},
    Router,
};

use crate::features::violations::handlers::{self, ViolationState};

/// Create routes for the violations feature
///
/// Every route requires authentication (auth middleware applied by caller).
/// Authority routes additionally check the caller's role.
pub fn routes(state: ViolationState) -> Router {
    Router::new()
        // Reporter
        .route(
            "/api/violations",
            post(handlers::submit_violation).get(handlers::list_my_violations),
        )
        .route("/api/violations/{id}", get(handlers::get_my_violation))
        .route(
            "/api/violations/{id}/timeline",
            get(handlers::get_my_timeline),
        )
        // Authority
        .route(
            "/api/authority/violations",
            get(handlers::list_violations),
        )
        .route(
            "/api/authority/violations/{id}",
            get(handlers::get_violation),
        )
        .route(
            "/api/authority/violations/{id}/status",
            post(handlers::append_status),
        )
        // Report form helper
        .route("/api/geocode/reverse", get(handlers::reverse_geocode))
        .with_state(state)
}
