use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use tracing::{error, info};

use crate::errors::AppError;
use crate::github::FileUpdate;
use crate::relay::clients::ClientSource;
use crate::relay::signature::{verify, SIGNATURE_HEADER};
use crate::relay::{ChangeRelay, RelayReceipt};
use crate::sync::fetch_resume;
use crate::sync::normalize::to_canonical_json;

/// Repository path of the canonical document.
pub const RESUME_FILE_PATH: &str = "resume.json";
pub const COMMIT_MESSAGE: &str = "Update resume from Sanity Studio";

/// Verifies the notification, pulls the remote document and commits it
/// straight to the target branch.
pub struct CommitRelay {
    secret: Option<String>,
    clients: Arc<dyn ClientSource>,
    branch: String,
}

impl CommitRelay {
    pub fn new(secret: Option<String>, clients: Arc<dyn ClientSource>, branch: String) -> Self {
        Self {
            secret,
            clients,
            branch,
        }
    }
}

#[async_trait]
impl ChangeRelay for CommitRelay {
    async fn receive_change(
        &self,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<RelayReceipt, AppError> {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if !verify(self.secret.as_deref(), body, provided) {
            error!("Invalid webhook signature");
            return Err(AppError::Unauthorized);
        }
        info!("Webhook signature verified");

        let repo_host = self.clients.repo_host()?;
        let store = self.clients.content_store()?;

        info!("Fetching resume data from the content store...");
        let resume = fetch_resume(store.as_ref()).await?;
        let content = to_canonical_json(&resume)?;

        let sha = repo_host.file_sha(RESUME_FILE_PATH, &self.branch).await?;

        info!("Committing {RESUME_FILE_PATH} to {}...", self.branch);
        let commit = repo_host
            .put_file(&FileUpdate {
                path: RESUME_FILE_PATH.to_string(),
                message: COMMIT_MESSAGE.to_string(),
                content: content.into_bytes(),
                sha,
                branch: self.branch.clone(),
            })
            .await?;
        info!("Committed {commit}");

        Ok(RelayReceipt {
            success: true,
            message: "Resume updated and committed to GitHub".to_string(),
            commit: Some(commit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    use crate::github::{GitHubError, MockRepoHost};
    use crate::relay::clients::MockClientSource;
    use crate::relay::signature::sign;
    use crate::store::MockContentStore;

    const SECRET: &str = "shh";

    fn signed_headers(body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let sig = sign(SECRET.as_bytes(), body).unwrap();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&sig).unwrap());
        headers
    }

    fn clients(store: MockContentStore, host: MockRepoHost) -> MockClientSource {
        let mut clients = MockClientSource::new();
        clients
            .expect_repo_host()
            .times(1)
            .return_once(move || Ok(Box::new(host)));
        clients
            .expect_content_store()
            .times(1)
            .return_once(move || Ok(Box::new(store)));
        clients
    }

    fn relay(store: MockContentStore, host: MockRepoHost) -> CommitRelay {
        CommitRelay::new(
            Some(SECRET.to_string()),
            Arc::new(clients(store, host)),
            "master".to_string(),
        )
    }

    fn remote_document() -> serde_json::Value {
        json!({
            "_id": "resume-data",
            "_type": "resume",
            "_rev": "r9",
            "basics": { "name": "Jordan Avery" }
        })
    }

    #[tokio::test]
    async fn test_wrong_signature_rejected_without_remote_calls() {
        let body = br#"{"x":1}"#;
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_static("sha256=0000000000000000000000000000000000000000000000000000000000000000"),
        );

        let mut clients = MockClientSource::new();
        clients.expect_repo_host().never();
        clients.expect_content_store().never();
        let relay = CommitRelay::new(
            Some(SECRET.to_string()),
            Arc::new(clients),
            "master".to_string(),
        );

        let err = relay
            .receive_change(body, &headers)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_secret_rejects_even_signed_requests() {
        let body = br#"{"x":1}"#;
        let mut clients = MockClientSource::new();
        clients.expect_repo_host().never();
        clients.expect_content_store().never();
        let relay = CommitRelay::new(None, Arc::new(clients), "master".to_string());
        let err = relay
            .receive_change(body, &signed_headers(body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_github_credential_is_configuration_error() {
        let body = b"{}";
        let mut clients = MockClientSource::new();
        clients
            .expect_repo_host()
            .returning(|| Err(AppError::Configuration("GITHUB_TOKEN not configured".into())));
        clients.expect_content_store().never();
        let relay = CommitRelay::new(
            Some(SECRET.to_string()),
            Arc::new(clients),
            "master".to_string(),
        );
        let err = relay
            .receive_change(body, &signed_headers(body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_valid_signature_commits_stripped_document() {
        let body = br#"{"_id":"resume-data"}"#;

        let mut store = MockContentStore::new();
        store
            .expect_get_document()
            .times(1)
            .returning(|_| Ok(Some(remote_document())));

        let mut host = MockRepoHost::new();
        host.expect_file_sha()
            .withf(|path, branch| path == RESUME_FILE_PATH && branch == "master")
            .times(1)
            .returning(|_, _| Ok("blob-sha".to_string()));
        host.expect_put_file()
            .withf(|update| {
                update.sha == "blob-sha"
                    && update.branch == "master"
                    && update.path == RESUME_FILE_PATH
                    && update.message == COMMIT_MESSAGE
                    && update.content
                        == b"{\n  \"basics\": {\n    \"name\": \"Jordan Avery\"\n  }\n}\n".to_vec()
            })
            .times(1)
            .returning(|_| Ok("commit-sha".to_string()));

        let receipt = relay(store, host)
            .receive_change(body, &signed_headers(body))
            .await
            .unwrap();
        assert_eq!(receipt.commit.as_deref(), Some("commit-sha"));
        assert!(receipt.success);
    }

    #[tokio::test]
    async fn test_each_notification_builds_its_own_clients() {
        let body = b"{}";
        let mut clients = MockClientSource::new();
        clients.expect_repo_host().times(2).returning(|| {
            let mut host = MockRepoHost::new();
            host.expect_file_sha()
                .times(1)
                .returning(|_, _| Ok("blob-sha".to_string()));
            host.expect_put_file()
                .times(1)
                .returning(|_| Ok("commit-sha".to_string()));
            Ok(Box::new(host))
        });
        clients.expect_content_store().times(2).returning(|| {
            let mut store = MockContentStore::new();
            store
                .expect_get_document()
                .times(1)
                .returning(|_| Ok(Some(remote_document())));
            Ok(Box::new(store))
        });
        let relay = CommitRelay::new(
            Some(SECRET.to_string()),
            Arc::new(clients),
            "master".to_string(),
        );

        for _ in 0..2 {
            relay
                .receive_change(body, &signed_headers(body))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_missing_remote_document_aborts_before_github() {
        let body = b"{}";
        let mut store = MockContentStore::new();
        store.expect_get_document().returning(|_| Ok(None));
        let mut host = MockRepoHost::new();
        host.expect_file_sha().never();
        host.expect_put_file().never();

        let err = relay(store, host)
            .receive_change(body, &signed_headers(body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_step_failure_skips_write() {
        let body = b"{}";
        let mut store = MockContentStore::new();
        store
            .expect_get_document()
            .returning(|_| Ok(Some(remote_document())));
        let mut host = MockRepoHost::new();
        host.expect_file_sha().returning(|_, _| {
            Err(GitHubError::Api {
                step: "get file",
                status: 404,
                message: "Not Found".to_string(),
            })
        });
        host.expect_put_file().never();

        let err = relay(store, host)
            .receive_change(body, &signed_headers(body))
            .await
            .unwrap_err();
        match err {
            AppError::Upstream { service, status, .. } => {
                assert_eq!(service, "GitHub (get file)");
                assert_eq!(status, 404);
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
