//! unir - quorum-driven merge bot for GitHub
//!
//! Receives review and status webhooks, decides from the repository's
//! `.unir.yml` whether a pull request has enough agreement, and merges it
//! when it does. Every decision is recomputed from GitHub's current state;
//! nothing is persisted between events.

pub mod auth;
pub mod error;
pub mod logging;
pub mod merge;
pub mod platform;
pub mod policy;
pub mod types;
pub mod webhook;

/// Commit status context unir reports under
pub const STATUS_CONTEXT: &str = "unir";
