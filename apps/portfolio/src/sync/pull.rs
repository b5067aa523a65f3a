//! Pull: remote store → canonical `resume.json`.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::store::{ContentStore, RESUME_DOCUMENT_ID};
use crate::sync::normalize::{strip_bookkeeping, to_canonical_json};

/// Section counts reported after a pull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullSummary {
    pub jobs: usize,
    pub projects: usize,
    pub skills: usize,
    pub schools: usize,
}

impl PullSummary {
    fn from_document(document: &Value) -> Self {
        let count = |pointer: &str| {
            document
                .pointer(pointer)
                .and_then(Value::as_array)
                .map_or(0, Vec::len)
        };
        Self {
            jobs: count("/work/jobs"),
            projects: count("/projects/projects"),
            skills: count("/skills/skills"),
            schools: count("/education/schools"),
        }
    }
}

/// Fetches the remote document and overwrites the canonical file with it.
///
/// The file is only touched once the full document has been fetched and
/// serialized, so a failed fetch leaves it as it was. It is overwritten in
/// place: its permissions stay and a symlink keeps pointing at its target.
pub async fn pull(store: &dyn ContentStore, resume_path: &Path) -> Result<PullSummary, AppError> {
    info!("Fetching resume document from the content store...");
    let resume = fetch_resume(store).await?;
    info!("Data fetched");

    let contents = to_canonical_json(&resume)?;

    info!("Writing {}...", resume_path.display());
    tokio::fs::write(resume_path, contents).await?;
    info!("{} updated", resume_path.display());

    Ok(PullSummary::from_document(&resume))
}

/// Fetches the remote document without its bookkeeping fields.
pub async fn fetch_resume(store: &dyn ContentStore) -> Result<Value, AppError> {
    let document = store
        .get_document(RESUME_DOCUMENT_ID)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no '{RESUME_DOCUMENT_ID}' document in the content store; run `portfolio push` first"
            ))
        })?;
    Ok(strip_bookkeeping(document))
}
