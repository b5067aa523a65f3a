use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::errors::AppError;

/// Pinned remote-store API version.
pub const SANITY_API_VERSION: &str = "2024-10-05";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATASET: &str = "production";
const DEFAULT_BRANCH: &str = "master";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
///
/// Credentials are optional here: the operation that needs one reports a
/// configuration error when it is missing, so the relay still starts and can
/// answer its health check.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub resume_path: PathBuf,
    pub site_output_dir: PathBuf,
    pub pdf_output_dir: PathBuf,
    pub sanity: SanityConfig,
    pub github: GitHubConfig,
    pub webhook_secret: Option<String>,
}

/// Remote structured-content store settings.
#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub project_id: Option<String>,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
}

/// Repository-hosting API settings.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: Option<String>,
    /// `owner/repo`
    pub repo: Option<String>,
    pub branch: String,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            resume_path: optional_env("RESUME_JSON_PATH")
                .unwrap_or_else(|| "resume.json".to_string())
                .into(),
            site_output_dir: optional_env("SITE_OUTPUT_DIR")
                .unwrap_or_else(|| "dist".to_string())
                .into(),
            pdf_output_dir: optional_env("PDF_OUTPUT_DIR")
                .unwrap_or_else(|| "pdf/output".to_string())
                .into(),
            sanity: SanityConfig {
                project_id: optional_env("SANITY_PROJECT_ID")
                    .or_else(|| optional_env("SANITY_STUDIO_PROJECT_ID")),
                dataset: optional_env("SANITY_DATASET")
                    .or_else(|| optional_env("SANITY_STUDIO_DATASET"))
                    .unwrap_or_else(|| DEFAULT_DATASET.to_string()),
                api_version: SANITY_API_VERSION.to_string(),
                token: optional_env("SANITY_API_TOKEN"),
            },
            github: GitHubConfig {
                token: optional_env("GITHUB_TOKEN"),
                repo: optional_env("GITHUB_REPO"),
                branch: optional_env("GITHUB_BRANCH")
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                api_url: optional_env("GITHUB_API_URL")
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            },
            webhook_secret: optional_env("SANITY_WEBHOOK_SECRET"),
        })
    }
}

/// Port the relay listens on. Only `serve` needs it, so a bad value does
/// not stop the other commands.
pub fn listen_port() -> Result<u16> {
    parse_port(optional_env("PORT").as_deref())
}

fn parse_port(value: Option<&str>) -> Result<u16> {
    match value {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT must be a valid port number, got '{raw}'")),
    }
}

impl SanityConfig {
    pub fn require_project_id(&self) -> Result<&str, AppError> {
        self.project_id.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "Missing SANITY_PROJECT_ID or SANITY_STUDIO_PROJECT_ID in environment".to_string(),
            )
        })
    }
}

impl GitHubConfig {
    pub fn require_token(&self) -> Result<&str, AppError> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GITHUB_TOKEN not configured".to_string()))
    }

    /// Splits `GITHUB_REPO` into `(owner, repo)`.
    pub fn require_repo(&self) -> Result<(String, String), AppError> {
        let repo = self
            .repo
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GITHUB_REPO not configured".to_string()))?;
        parse_repo(repo)
    }
}

fn parse_repo(value: &str) -> Result<(String, String), AppError> {
    match value.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(AppError::Configuration(format!(
            "GITHUB_REPO must look like 'owner/repo', got '{value}'"
        ))),
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        rust_log: "info".to_string(),
        resume_path: "resume.json".into(),
        site_output_dir: "dist".into(),
        pdf_output_dir: "pdf/output".into(),
        sanity: SanityConfig {
            project_id: Some("abc123".to_string()),
            dataset: "production".to_string(),
            api_version: SANITY_API_VERSION.to_string(),
            token: Some("sanity-token".to_string()),
        },
        github: GitHubConfig {
            token: Some("gh-token".to_string()),
            repo: Some("someone/devportfolio".to_string()),
            branch: "master".to_string(),
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
        },
        webhook_secret: Some("shh".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_valid() {
        let (owner, repo) = parse_repo("someone/devportfolio").unwrap();
        assert_eq!(owner, "someone");
        assert_eq!(repo, "devportfolio");
    }

    #[test]
    fn test_parse_repo_rejects_malformed() {
        for bad in ["devportfolio", "/repo", "owner/", "a/b/c"] {
            assert!(
                matches!(parse_repo(bad), Err(AppError::Configuration(_))),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_port_defaults_and_parses() {
        assert_eq!(parse_port(None).unwrap(), 8080);
        assert_eq!(parse_port(Some("3000")).unwrap(), 3000);
    }

    #[test]
    fn test_malformed_port_is_rejected() {
        let err = parse_port(Some("eighty")).unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid port number"));
        assert!(parse_port(Some("70000")).is_err());
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let mut config = test_config();
        config.github.token = None;
        assert!(matches!(
            config.github.require_token(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_project_id_is_configuration_error() {
        let mut config = test_config();
        config.sanity.project_id = None;
        assert!(matches!(
            config.sanity.require_project_id(),
            Err(AppError::Configuration(_))
        ));
    }
}
