use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::relay::{ChangeRelay, ClientSource, CommitRelay, ConfiguredClients, DispatchRelay};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Variant mounted at `/sanity-webhook`.
    pub dispatch_relay: Arc<dyn ChangeRelay>,
    /// Variant mounted at `/api/sanity-webhook`.
    pub commit_relay: Arc<dyn ChangeRelay>,
}

impl AppState {
    /// Builds both relays from configuration.
    ///
    /// Remote clients are created per notification. Missing settings are only
    /// logged here; the relay that needs them answers with a configuration
    /// error instead of the server refusing to start.
    pub fn from_config(config: Config) -> Self {
        let missing = [
            config.github.require_token().err(),
            config.github.require_repo().err(),
            config.sanity.require_project_id().err(),
        ];
        for e in missing.into_iter().flatten() {
            warn!("{e}");
        }

        let clients: Arc<dyn ClientSource> = Arc::new(ConfiguredClients::new(
            config.sanity.clone(),
            config.github.clone(),
        ));

        let dispatch_relay = Arc::new(DispatchRelay::new(
            clients.clone(),
            config.sanity.project_id.clone(),
            config.sanity.dataset.clone(),
        ));
        let commit_relay = Arc::new(CommitRelay::new(
            config.webhook_secret.clone(),
            clients,
            config.github.branch.clone(),
        ));

        Self {
            config,
            dispatch_relay,
            commit_relay,
        }
    }
}
