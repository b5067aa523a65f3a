//! Push: canonical `resume.json` → remote store.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::store::{ContentStore, MutationReceipt, RESUME_DOCUMENT_ID, RESUME_DOCUMENT_TYPE};
use crate::sync::normalize::{normalize_newlines, strip_bookkeeping};

/// Which write path a push took.
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    Created(MutationReceipt),
    Updated(MutationReceipt),
}

/// Reads the canonical file and writes it to the remote store.
pub async fn push(store: &dyn ContentStore, resume_path: &Path) -> Result<PushOutcome, AppError> {
    info!("Reading {}...", resume_path.display());
    let raw = tokio::fs::read_to_string(resume_path).await?;
    let document: Value = serde_json::from_str(&raw)?;
    info!("Resume data loaded");

    push_document(store, document).await
}

/// Normalizes `document` and creates or patches the remote copy.
pub async fn push_document(
    store: &dyn ContentStore,
    document: Value,
) -> Result<PushOutcome, AppError> {
    let payload = prepare_payload(document)?;

    info!("Checking for existing remote document...");
    let existing = store.get_document(RESUME_DOCUMENT_ID).await?;

    match existing {
        Some(_) => {
            info!("Updating existing document...");
            let receipt = store
                .patch_set(RESUME_DOCUMENT_ID, Value::Object(payload))
                .await?;
            info!(
                "Document updated: id={} updated_at={}",
                receipt.document_id,
                receipt.updated_at.as_deref().unwrap_or("unknown")
            );
            Ok(PushOutcome::Updated(receipt))
        }
        None => {
            info!("Creating new document...");
            let receipt = store.create_document(tagged_document(payload)).await?;
            info!(
                "Document created: id={} created_at={}",
                receipt.document_id,
                receipt.created_at.as_deref().unwrap_or("unknown")
            );
            Ok(PushOutcome::Created(receipt))
        }
    }
}

/// Validates against the resume schema, strips bookkeeping and normalizes newlines.
fn prepare_payload(document: Value) -> Result<Map<String, Value>, AppError> {
    serde_json::from_value::<ResumeDocument>(document.clone())?;

    match normalize_newlines(strip_bookkeeping(document)) {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Validation(
            "resume document must be a JSON object".to_string(),
        )),
    }
}

/// `_id` and `_type` first, then the payload fields in their original order.
fn tagged_document(payload: Map<String, Value>) -> Value {
    let mut document = Map::new();
    document.insert("_id".to_string(), Value::from(RESUME_DOCUMENT_ID));
    document.insert("_type".to_string(), Value::from(RESUME_DOCUMENT_TYPE));
    document.extend(payload);
    Value::Object(document)
}
