//! Error types for unir

use thiserror::Error;

/// Errors raised while deciding on or merging a pull request
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned something we could not use
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error surfaced by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Raw HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Policy document could not be parsed
    #[error("invalid policy: {0}")]
    Policy(String),

    /// Policy document is absent on the base branch
    #[error("policy file {path} not found on {reference}")]
    PolicyNotFound {
        /// Path of the policy document
        path: String,
        /// Ref that was searched
        reference: String,
    },

    /// Credential setup or token exchange failed
    #[error("authentication error: {0}")]
    Auth(String),

    /// Process configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// The run exceeded its deadline
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
