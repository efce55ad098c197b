//! Platform services for GitHub
//!
//! Everything the merge pipeline needs from the hosting platform sits
//! behind [`PlatformService`], so the pipeline can run against a mock.

mod factory;
mod github;

pub use factory::{GitHubFactory, PlatformFactory};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    CommitState, MergeMethod, MergeResult, PlatformConfig, PullRequestDetails, ReviewRecord,
};
use async_trait::async_trait;

/// Platform service trait for pull request operations
///
/// A service is scoped to the repository in its [`PlatformConfig`].
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List every review on a PR in chronological order, following pagination
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<ReviewRecord>>;

    /// List the paths of every file a PR changes, following pagination
    async fn list_changed_files(&self, pr_number: u64) -> Result<Vec<String>>;

    /// Fetch the raw content of a file at a ref
    ///
    /// Returns `Ok(None)` when the file does not exist at that ref.
    async fn get_file_content(&self, path: &str, reference: &str) -> Result<Option<String>>;

    /// Create a commit status on `sha` under the bot's status context
    async fn create_commit_status(
        &self,
        sha: &str,
        state: CommitState,
        description: &str,
    ) -> Result<()>;

    /// Merge a PR, pinned to `sha` so a moved head is rejected
    async fn merge_pr(
        &self,
        pr_number: u64,
        sha: &str,
        method: MergeMethod,
        message: &str,
    ) -> Result<MergeResult>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Numbers of open PRs whose head includes `sha`, most recently updated first
    async fn find_open_prs_by_commit(&self, sha: &str) -> Result<Vec<u64>>;

    /// Get PR details (title, head commit, base branch)
    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
