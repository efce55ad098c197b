//! Repository merge policy
//!
//! Every repository opts in by committing a `.unir.yml` to its base branch:
//!
//! ```yaml
//! whitelist:
//!   - alice
//!   - bob
//! approvals_needed: 2
//! consensus_needed: true
//! merge_method: squash
//! merge_block_keywords:
//!   - "WIP:"
//!   - "DO NOT MERGE"
//! ```
//!
//! The policy is read from the platform on every run and never cached.

use crate::error::{Error, Result};
use crate::types::MergeMethod;
use serde::Deserialize;

/// Path of the policy document inside a repository
pub const POLICY_PATH: &str = ".unir.yml";

/// Title keyword used when a policy lists none
pub const DEFAULT_BLOCK_KEYWORD: &str = "WIP:";

/// How many approvals a change needs, and whether dissent vetoes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumRule {
    /// Minimum number of approvals from eligible voters
    pub approval_threshold: u32,
    /// Any request for changes from an eligible voter blocks the merge
    pub require_unanimity: bool,
}

impl Default for QuorumRule {
    /// One approval, no dissent.
    fn default() -> Self {
        Self {
            approval_threshold: 1,
            require_unanimity: true,
        }
    }
}

/// Parsed `.unir.yml`
///
/// Unknown fields are ignored and missing fields fall back to their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Logins whose reviews count (compared case-insensitively)
    #[serde(rename = "whitelist")]
    pub eligible_voters: Vec<String>,
    /// Approvals needed before merging
    #[serde(rename = "approvals_needed")]
    pub approval_threshold: u32,
    /// Whether a single request for changes vetoes the merge
    #[serde(rename = "consensus_needed")]
    pub require_unanimity: bool,
    /// Strategy passed to the merge call
    #[serde(rename = "merge_method")]
    pub merge_strategy: MergeMethod,
    /// Title substrings that block automatic merging
    #[serde(rename = "merge_block_keywords")]
    pub blocking_title_keywords: Vec<String>,
}

impl Policy {
    /// Parse a policy document
    pub fn from_yaml(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).map_err(|e| Error::Policy(e.to_string()))
    }

    /// The quorum rule this policy describes
    pub const fn quorum_rule(&self) -> QuorumRule {
        QuorumRule {
            approval_threshold: self.approval_threshold,
            require_unanimity: self.require_unanimity,
        }
    }

    /// Keywords to check titles against.
    ///
    /// An empty list resolves to [`DEFAULT_BLOCK_KEYWORD`], including when the
    /// policy sets `merge_block_keywords: []` explicitly.
    pub fn resolved_block_keywords(&self) -> Vec<&str> {
        if self.blocking_title_keywords.is_empty() {
            vec![DEFAULT_BLOCK_KEYWORD]
        } else {
            self.blocking_title_keywords
                .iter()
                .map(String::as_str)
                .collect()
        }
    }
}
