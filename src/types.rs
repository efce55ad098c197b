//! Core types for unir

use serde::{Deserialize, Serialize};

/// A reviewer's verdict on a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Reviewer approved the change
    Approve,
    /// Reviewer requested changes
    RequestChanges,
    /// Any other review state (comment, dismissed, pending)
    NoVerdict,
}

/// One review as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    /// Login of the reviewer
    pub voter: String,
    /// Verdict carried by the review
    pub verdict: Verdict,
    /// Commit the review was submitted against
    pub commit_id: String,
    /// Web URL of the review (for logs)
    pub html_url: String,
}

/// The pull request under decision
///
/// Built fresh from each inbound event and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeContext {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Current head commit of the pull request
    pub head_sha: String,
    /// Pull request number
    pub pr_number: u64,
    /// Pull request title
    pub title: String,
    /// Branch the pull request targets
    pub base_ref: String,
}

impl ChangeContext {
    /// Web URL of the pull request, used to correlate log lines
    pub fn html_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/pull/{}",
            self.owner, self.repo, self.pr_number
        )
    }
}

/// Outcome of evaluating votes against a policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementResult {
    /// Whether the policy is satisfied
    pub reached: bool,
    /// Why the policy is not satisfied (empty when reached)
    pub reason: String,
}

impl AgreementResult {
    /// Agreement reached
    pub const fn reached() -> Self {
        Self {
            reached: true,
            reason: String::new(),
        }
    }

    /// Agreement not reached for the given reason
    pub fn pending(reason: impl Into<String>) -> Self {
        Self {
            reached: false,
            reason: reason.into(),
        }
    }
}

/// Platform configuration for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// Extended PR details needed to rebuild a [`ChangeContext`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head commit SHA
    pub head_sha: String,
    /// Base branch name
    pub base_ref: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// State of a commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    /// Waiting on something
    Pending,
    /// Completed successfully
    Success,
    /// Completed unsuccessfully
    Failure,
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Result of a merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
