//! Remote content store client. The only module that talks to the Sanity HTTP API.
//!
//! The client is built explicitly from `SanityConfig` for each invocation; nothing
//! here is global. Calls are single attempts: no retries, no caller timeout.
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::SanityConfig;
use crate::errors::AppError;

/// Fixed identifier of the single resume document.
pub const RESUME_DOCUMENT_ID: &str = "resume-data";
/// Type discriminator of the resume document.
pub const RESUME_DOCUMENT_TYPE: &str = "resume";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Http(e) => AppError::Http(e),
            StoreError::Api { status, message } => AppError::Upstream {
                service: "Sanity".to_string(),
                status,
                message,
            },
            StoreError::UnexpectedResponse(msg) => {
                AppError::Internal(anyhow::anyhow!("Sanity returned an unexpected response: {msg}"))
            }
        }
    }
}

/// What a create or patch returned, kept for logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationReceipt {
    pub document_id: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Read/write access to the remote document store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetches a document by id. A missing document is `Ok(None)`, not an error.
    async fn get_document(&self, id: &str) -> Result<Option<Value>, StoreError>;

    /// Creates a new document. `document` must carry `_id` and `_type`.
    async fn create_document(&self, document: Value) -> Result<MutationReceipt, StoreError>;

    /// Sets top-level fields on an existing document.
    async fn patch_set(&self, id: &str, fields: Value) -> Result<MutationReceipt, StoreError>;
}

#[derive(Debug, Deserialize)]
struct DocResponse {
    #[serde(default)]
    documents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
    document: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SanityErrorBody {
    error: Option<SanityErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SanityErrorDetail {
    description: Option<String>,
}

/// HTTP implementation of [`ContentStore`] against `https://{project}.api.sanity.io`.
#[derive(Clone)]
pub struct SanityClient {
    client: Client,
    base_url: String,
    dataset: String,
    token: Option<String>,
}

impl SanityClient {
    pub fn new(config: &SanityConfig) -> Result<Self, AppError> {
        let project_id = config.require_project_id()?;
        Ok(Self {
            client: Client::new(),
            base_url: format!(
                "https://{project_id}.api.sanity.io/v{}",
                config.api_version
            ),
            dataset: config.dataset.clone(),
            token: config.token.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn mutate(&self, mutation: Value) -> Result<MutationReceipt, StoreError> {
        let url = format!(
            "{}/data/mutate/{}?returnDocuments=true",
            self.base_url, self.dataset
        );
        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({ "mutations": [mutation] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        let body: MutateResponse = response.json().await?;
        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::UnexpectedResponse("mutation returned no results".into()))?;

        let field = |name: &str| {
            result
                .document
                .as_ref()
                .and_then(|d| d.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Ok(MutationReceipt {
            created_at: field("_createdAt"),
            updated_at: field("_updatedAt"),
            document_id: result.id,
        })
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn get_document(&self, id: &str) -> Result<Option<Value>, StoreError> {
        let url = format!("{}/data/doc/{}/{}", self.base_url, self.dataset, id);
        let response = self.authorized(self.client.get(&url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        let body: DocResponse = response.json().await?;
        debug!("Fetched {} document(s) for id {id}", body.documents.len());
        Ok(body.documents.into_iter().next())
    }

    async fn create_document(&self, document: Value) -> Result<MutationReceipt, StoreError> {
        self.mutate(json!({ "create": document })).await
    }

    async fn patch_set(&self, id: &str, fields: Value) -> Result<MutationReceipt, StoreError> {
        self.mutate(json!({ "patch": { "id": id, "set": fields } }))
            .await
    }
}

fn api_error(status: StatusCode, body: String) -> StoreError {
    // Prefer the API's own description when the body parses
    let message = serde_json::from_str::<SanityErrorBody>(&body)
        .ok()
        .and_then(|e| e.error.and_then(|d| d.description).or(e.message))
        .unwrap_or(body);
    StoreError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_client_requires_project_id() {
        let mut config = test_config();
        config.sanity.project_id = None;
        assert!(matches!(
            SanityClient::new(&config.sanity),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_base_url_uses_project_and_version() {
        let config = test_config();
        let client = SanityClient::new(&config.sanity).unwrap();
        assert_eq!(client.base_url, "https://abc123.api.sanity.io/v2024-10-05");
        assert_eq!(client.dataset, "production");
    }

    #[test]
    fn test_api_error_prefers_description() {
        let body = r#"{"error":{"description":"Session not found","type":"auth"}}"#;
        match api_error(StatusCode::UNAUTHORIZED, body.to_string()) {
            StoreError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Session not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match api_error(StatusCode::BAD_GATEWAY, "upstream down".to_string()) {
            StoreError::Api { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_store_error_converts_to_upstream() {
        let err: AppError = StoreError::Api {
            status: 401,
            message: "nope".into(),
        }
        .into();
        assert!(err.is_upstream_unauthorized());
    }
}
