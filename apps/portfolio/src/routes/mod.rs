pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::relay::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Dispatch-forwarding relay
        .route("/sanity-webhook", post(handlers::handle_dispatch_webhook))
        // Direct-commit relay
        .route(
            "/api/sanity-webhook",
            post(handlers::handle_commit_webhook).get(handlers::handle_commit_webhook_status),
        )
        .with_state(state)
}
