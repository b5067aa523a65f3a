//! Axum route handlers for the webhook relay.

use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::relay::RelayReceipt;
use crate::state::AppState;

/// POST /sanity-webhook
///
/// Dispatch-forwarding strategy. Other methods get 405 from the router.
pub async fn handle_dispatch_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RelayReceipt>, AppError> {
    info!("Received content webhook (dispatch)");
    let receipt = state.dispatch_relay.receive_change(&body, &headers).await?;
    Ok(Json(receipt))
}

/// POST /api/sanity-webhook
///
/// Signature-verified direct-commit strategy.
pub async fn handle_commit_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RelayReceipt>, AppError> {
    info!("Received content webhook (commit)");
    let receipt = state.commit_relay.receive_change(&body, &headers).await?;
    Ok(Json(receipt))
}

/// GET /api/sanity-webhook
///
/// Reports which settings are present. Never echoes secret values.
pub async fn handle_commit_webhook_status(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "ok",
        "message": "Sanity webhook endpoint is running",
        "configured": {
            "webhookSecret": config.webhook_secret.is_some(),
            "githubToken": config.github.token.is_some(),
            "githubRepo": config.github.repo.is_some(),
            "sanityProjectId": config.sanity.project_id.is_some(),
            "githubBranch": config.github.branch,
        }
    }))
}
