//! Command-line interface
//!
//! All process configuration is read once here, from flags or `UNIR_*`
//! environment variables.

pub mod context;
pub mod serve;

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use unir::logging::LogConfig;

/// Merge bot that merges GitHub pull requests once their reviewers agree
#[derive(Debug, Parser)]
#[command(name = "unir", version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "UNIR_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "UNIR_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Shared secret used to sign webhook deliveries
    #[arg(long, env = "UNIR_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,

    /// Authenticate with a static token instead of as a GitHub App
    #[arg(long)]
    pub oauth_mode: bool,

    /// Token used in --oauth-mode
    #[arg(long, env = "UNIR_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// GitHub App (integration) id
    #[arg(long, env = "UNIR_INTEGRATION_ID")]
    pub integration_id: Option<u64>,

    /// Path to the GitHub App private key (PEM)
    #[arg(long, env = "UNIR_KEYFILE")]
    pub keyfile: Option<PathBuf>,

    /// GitHub Enterprise host (defaults to github.com)
    #[arg(long, env = "UNIR_GITHUB_HOST")]
    pub github_host: Option<String>,

    /// Deadline for one merge run, in seconds
    #[arg(long, default_value_t = 300)]
    pub run_timeout_secs: u64,

    /// Toggle debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Logging configuration implied by the flags
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            verbosity: self.verbose.max(u8::from(self.debug)),
        }
    }
}
