//! Authentication for GitHub
//!
//! Supports a static token (OAuth mode) and GitHub App installations.

mod app;

pub use app::{generate_app_jwt, mint_installation_token};

use crate::error::{Error, Result};
use std::path::Path;

/// Source of authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// One token shared by every event
    Token,
    /// Per-installation tokens minted from a GitHub App key
    App,
}

/// Credentials the bot authenticates with
#[derive(Clone)]
pub enum GitHubAuth {
    /// Personal access or OAuth token
    Token(String),
    /// GitHub App id and PEM-encoded private key
    App {
        /// GitHub App (integration) id
        app_id: u64,
        /// RSA private key in PEM form
        private_key: String,
    },
}

impl GitHubAuth {
    /// Load GitHub App credentials, reading the key from `keyfile`
    pub fn app_from_keyfile(app_id: u64, keyfile: &Path) -> Result<Self> {
        let private_key = std::fs::read_to_string(keyfile).map_err(|e| {
            Error::Config(format!("failed to read keyfile {}: {e}", keyfile.display()))
        })?;
        Ok(Self::App {
            app_id,
            private_key,
        })
    }

    /// Which kind of credential this is
    pub const fn source(&self) -> AuthSource {
        match self {
            Self::Token(_) => AuthSource::Token,
            Self::App { .. } => AuthSource::App,
        }
    }
}

// Never print key material.
impl std::fmt::Debug for GitHubAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("GitHubAuth::Token(..)"),
            Self::App { app_id, .. } => write!(f, "GitHubAuth::App {{ app_id: {app_id} }}"),
        }
    }
}
