//! Server context built from the command line
//!
//! Validates credentials and wires the platform factory into a dispatcher
//! before anything binds a port.

use crate::cli::Cli;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use unir::auth::GitHubAuth;
use unir::error::{Error, Result};
use unir::merge::PipelineOptions;
use unir::platform::GitHubFactory;
use unir::webhook::{Dispatcher, GatewayState};

/// Everything the server needs to start
pub struct ServerContext {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Gateway state (secret + dispatcher)
    pub gateway: GatewayState,
}

impl ServerContext {
    /// Validate the command line and build the context
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.webhook_secret.is_empty() {
            return Err(Error::Config("webhook secret must not be empty".to_string()));
        }

        let auth = resolve_auth(cli)?;
        let factory = GitHubFactory::new(auth, cli.github_host.clone())?;

        let options = PipelineOptions {
            deadline: Duration::from_secs(cli.run_timeout_secs),
            ..PipelineOptions::default()
        };
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(factory), options));

        Ok(Self {
            addr: SocketAddr::new(cli.bind, cli.port),
            gateway: GatewayState::new(cli.webhook_secret.as_bytes(), dispatcher),
        })
    }
}

fn resolve_auth(cli: &Cli) -> Result<GitHubAuth> {
    if cli.oauth_mode {
        let token = cli
            .api_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config("--oauth-mode requires UNIR_API_TOKEN".to_string()))?;
        return Ok(GitHubAuth::Token(token));
    }

    let app_id = cli
        .integration_id
        .ok_or_else(|| Error::Config("UNIR_INTEGRATION_ID is required".to_string()))?;
    let keyfile = cli
        .keyfile
        .as_ref()
        .ok_or_else(|| Error::Config("UNIR_KEYFILE is required".to_string()))?;
    GitHubAuth::app_from_keyfile(app_id, keyfile)
}
