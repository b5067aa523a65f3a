//! Repository-hosting API client used by the webhook relays.
//!
//! Covers the three calls the relays need: a repository dispatch, reading a
//! file's blob SHA, and replacing a file's contents on a branch.
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::GitHubConfig;
use crate::errors::AppError;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `step` names the call that failed.
    #[error("GitHub API error ({step}, status {status}): {message}")]
    Api {
        step: &'static str,
        status: u16,
        message: String,
    },
}

impl From<GitHubError> for AppError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => AppError::Http(e),
            GitHubError::Api {
                step,
                status,
                message,
            } => AppError::Upstream {
                service: format!("GitHub ({step})"),
                status,
                message,
            },
        }
    }
}

/// `owner/repo` pair the relays act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

/// A `repository_dispatch` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchEvent {
    pub event_type: String,
    pub client_payload: Value,
}

/// A single-file commit.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpdate {
    pub path: String,
    pub message: String,
    /// Raw file bytes; base64-encoded on the wire.
    pub content: Vec<u8>,
    /// Blob SHA the update is based on.
    pub sha: String,
    pub branch: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    async fn dispatch(&self, event: &DispatchEvent) -> Result<(), GitHubError>;

    /// Current blob SHA of `path` on `branch`.
    async fn file_sha(&self, path: &str, branch: &str) -> Result<String, GitHubError>;

    /// Commits `update` and returns the new commit SHA.
    async fn put_file(&self, update: &FileUpdate) -> Result<String, GitHubError>;
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: String,
    repo: RepoRef,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, AppError> {
        let token = config.require_token()?.to_string();
        let (owner, repo) = config.require_repo()?;
        Ok(Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            repo: RepoRef { owner, repo },
        })
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repo.owner, self.repo.repo, suffix
        )
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
    }
}

async fn check(step: &'static str, response: reqwest::Response) -> Result<reqwest::Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GitHubError::Api {
        step,
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn dispatch(&self, event: &DispatchEvent) -> Result<(), GitHubError> {
        let response = self
            .with_headers(self.client.post(self.repo_url("dispatches")))
            .json(event)
            .send()
            .await?;
        check("dispatch", response).await?;
        Ok(())
    }

    async fn file_sha(&self, path: &str, branch: &str) -> Result<String, GitHubError> {
        let response = self
            .with_headers(self.client.get(self.repo_url(&format!("contents/{path}"))))
            .query(&[("ref", branch)])
            .send()
            .await?;
        let contents: ContentsResponse = check("get file", response).await?.json().await?;
        Ok(contents.sha)
    }

    async fn put_file(&self, update: &FileUpdate) -> Result<String, GitHubError> {
        let body = PutContentsRequest {
            message: &update.message,
            content: STANDARD.encode(&update.content),
            sha: &update.sha,
            branch: &update.branch,
        };
        let response = self
            .with_headers(
                self.client
                    .put(self.repo_url(&format!("contents/{}", update.path))),
            )
            .json(&body)
            .send()
            .await?;
        let committed: PutContentsResponse = check("update file", response).await?.json().await?;
        Ok(committed.commit.sha)
    }
}
