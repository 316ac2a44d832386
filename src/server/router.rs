//! Router construction for the action server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::actions::ActionRegistry;
use crate::server::handlers;

/// Build the full axum router with all routes and middleware.
pub fn build_router(registry: Arc<ActionRegistry>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/actions", get(handlers::list_actions))
        .route("/webhook", post(handlers::webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}
