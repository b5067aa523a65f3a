use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::github::DispatchEvent;
use crate::relay::clients::ClientSource;
use crate::relay::{ChangeRelay, RelayReceipt};

/// Event name the repository's sync workflow listens for.
pub const SYNC_EVENT_TYPE: &str = "sanity-update";

/// Forwards every notification as a `repository_dispatch` event; the repository's
/// own automation then pulls the document.
pub struct DispatchRelay {
    clients: Arc<dyn ClientSource>,
    sanity_project: Option<String>,
    dataset: String,
}

impl DispatchRelay {
    pub fn new(
        clients: Arc<dyn ClientSource>,
        sanity_project: Option<String>,
        dataset: String,
    ) -> Self {
        Self {
            clients,
            sanity_project,
            dataset,
        }
    }
}

#[async_trait]
impl ChangeRelay for DispatchRelay {
    async fn receive_change(
        &self,
        _body: &[u8],
        _headers: &HeaderMap,
    ) -> Result<RelayReceipt, AppError> {
        let repo_host = self.clients.repo_host()?;
        let project = self.sanity_project.as_deref().ok_or_else(|| {
            AppError::Configuration("SANITY_PROJECT_ID not configured".to_string())
        })?;

        let event = DispatchEvent {
            event_type: SYNC_EVENT_TYPE.to_string(),
            client_payload: json!({
                "sanity_project": project,
                "dataset": self.dataset,
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
        };

        repo_host.dispatch(&event).await?;
        info!("Triggered repository sync workflow");

        Ok(RelayReceipt::ok("GitHub Action triggered successfully"))
    }
}
