//! Platform service factory
//!
//! Each event gets its own service, authenticated for the installation that
//! sent it and scoped to the event's repository.

use crate::auth::{GitHubAuth, mint_installation_token};
use crate::error::{Error, Result};
use crate::platform::github::api_base_url;
use crate::platform::{GitHubService, PlatformService};
use crate::types::PlatformConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Creates platform services for inbound events
#[async_trait]
pub trait PlatformFactory: Send + Sync {
    /// Build a service for `owner/repo`, authenticated for `installation_id`
    async fn create(
        &self,
        installation_id: Option<u64>,
        owner: &str,
        repo: &str,
    ) -> Result<Arc<dyn PlatformService>>;
}

/// Factory producing [`GitHubService`] instances
pub struct GitHubFactory {
    auth: GitHubAuth,
    host: Option<String>,
    http_client: Client,
}

impl GitHubFactory {
    /// Create a factory for github.com or, with `host`, GitHub Enterprise
    pub fn new(auth: GitHubAuth, host: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent("unir")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            auth,
            host,
            http_client,
        })
    }

    fn api_base_url(&self) -> String {
        api_base_url(self.host.as_deref())
    }
}

#[async_trait]
impl PlatformFactory for GitHubFactory {
    async fn create(
        &self,
        installation_id: Option<u64>,
        owner: &str,
        repo: &str,
    ) -> Result<Arc<dyn PlatformService>> {
        let token = match &self.auth {
            GitHubAuth::Token(token) => token.clone(),
            GitHubAuth::App {
                app_id,
                private_key,
            } => {
                let installation_id = installation_id.ok_or_else(|| {
                    Error::Auth("event carries no installation id".to_string())
                })?;
                mint_installation_token(
                    &self.http_client,
                    &self.api_base_url(),
                    *app_id,
                    private_key,
                    installation_id,
                )
                .await?
            }
        };

        debug!(owner, repo, source = ?self.auth.source(), "creating GitHub service");
        let service = GitHubService::new(
            &token,
            PlatformConfig {
                owner: owner.to_string(),
                repo: repo.to_string(),
                host: self.host.clone(),
            },
        )?;
        Ok(Arc::new(service))
    }
}
