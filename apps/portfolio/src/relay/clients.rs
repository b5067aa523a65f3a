//! Remote clients for a single relay invocation.

use crate::config::{GitHubConfig, SanityConfig};
use crate::errors::AppError;
use crate::github::{GitHubClient, RepoHost};
use crate::store::{ContentStore, SanityClient};

/// Hands out remote clients on demand. Relays ask once per notification and
/// drop the client when the invocation ends.
#[cfg_attr(test, mockall::automock)]
pub trait ClientSource: Send + Sync {
    fn repo_host(&self) -> Result<Box<dyn RepoHost>, AppError>;
    fn content_store(&self) -> Result<Box<dyn ContentStore>, AppError>;
}

/// Builds clients from the loaded settings. A missing credential surfaces as
/// a configuration error from the invocation that needed it.
pub struct ConfiguredClients {
    sanity: SanityConfig,
    github: GitHubConfig,
}

impl ConfiguredClients {
    pub fn new(sanity: SanityConfig, github: GitHubConfig) -> Self {
        Self { sanity, github }
    }
}

impl ClientSource for ConfiguredClients {
    fn repo_host(&self) -> Result<Box<dyn RepoHost>, AppError> {
        Ok(Box::new(GitHubClient::new(&self.github)?))
    }

    fn content_store(&self) -> Result<Box<dyn ContentStore>, AppError> {
        Ok(Box::new(SanityClient::new(&self.sanity)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_configured_clients_build_when_settings_present() {
        let config = test_config();
        let clients = ConfiguredClients::new(config.sanity, config.github);
        assert!(clients.repo_host().is_ok());
        assert!(clients.content_store().is_ok());
    }

    #[test]
    fn test_missing_settings_are_configuration_errors() {
        let mut config = test_config();
        config.github.token = None;
        config.sanity.project_id = None;
        let clients = ConfiguredClients::new(config.sanity, config.github);
        assert!(matches!(clients.repo_host(), Err(AppError::Configuration(_))));
        assert!(matches!(
            clients.content_store(),
            Err(AppError::Configuration(_))
        ));
    }
}
