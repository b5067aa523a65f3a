// Webhook relay: reacts to a content-store change notification and propagates it.
// Two interchangeable strategies sit behind `ChangeRelay`:
//   DispatchRelay: forwards a repository_dispatch event to the hosting API.
//   CommitRelay:   verifies the signature, pulls the document, commits resume.json.

pub mod clients;
pub mod commit;
pub mod dispatch;
pub mod handlers;
pub mod signature;

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::errors::AppError;

pub use clients::{ClientSource, ConfiguredClients};
pub use commit::CommitRelay;
pub use dispatch::DispatchRelay;

/// Success acknowledgment returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayReceipt {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl RelayReceipt {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            commit: None,
        }
    }
}

/// One invocation per inbound notification; implementations hold no state between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangeRelay: Send + Sync {
    async fn receive_change(
        &self,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<RelayReceipt, AppError>;
}
