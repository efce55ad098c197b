//! Merge orchestration - effectful pipeline
//!
//! One run per inbound event:
//! 1. Gather - policy, reviews, changed files (effectful, deadline-bound)
//! 2. Decide - reconcile, guard, evaluate (pure helpers)
//! 3. Act - report a status, merge, comment on failure (effectful)
//!
//! Nothing survives a run. A failed fetch ends the run without retry; the
//! next review or status event drives the pipeline again from scratch.

use crate::error::{Error, Result};
use crate::merge::agreement::evaluate_agreement;
use crate::merge::guard::{blocking_keyword, edits_policy};
use crate::merge::reconcile::{remove_stale_reviews, verdict_map};
use crate::platform::PlatformService;
use crate::policy::{POLICY_PATH, Policy};
use crate::types::{ChangeContext, CommitState};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Commit message attached to automatic merges
pub const MERGE_MESSAGE: &str = "Merged with unir";

/// Default deadline for one run
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(300);

const POLICY_EDIT_DESCRIPTION: &str = "Unable to merge automatically, editing unir config";
const TITLE_BLOCKED_DESCRIPTION: &str =
    "Automatic merging blocked, title contains keywords that prevent unir from automatically merging";
const MERGE_FAILED_DESCRIPTION: &str = "Failed to merge automatically";
const MERGED_DESCRIPTION: &str = "Merged automatically with unir";

/// Options for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Path of the policy document in the repository
    pub policy_path: String,
    /// Commit message for the merge
    pub merge_message: String,
    /// Deadline covering every platform call of the run
    pub deadline: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            policy_path: POLICY_PATH.to_string(),
            merge_message: MERGE_MESSAGE.to_string(),
            deadline: DEFAULT_RUN_TIMEOUT,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The change edits the policy document
    PolicyEdited,
    /// The title carries a blocking keyword
    TitleBlocked {
        /// Keyword that matched
        keyword: String,
    },
    /// Not enough agreement yet
    Pending {
        /// Evaluator's explanation
        reason: String,
    },
    /// The change was merged
    Merged {
        /// SHA of the merge commit, when reported
        sha: Option<String>,
    },
    /// The platform refused or failed the merge
    MergeFailed {
        /// Platform's explanation
        message: String,
    },
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PolicyEdited => write!(f, "policy file edited"),
            Self::TitleBlocked { keyword } => write!(f, "blocked by title keyword {keyword:?}"),
            Self::Pending { reason } => write!(f, "pending: {reason}"),
            Self::Merged { sha } => {
                write!(f, "merged")?;
                if let Some(sha) = sha {
                    write!(f, " as {sha}")?;
                }
                Ok(())
            }
            Self::MergeFailed { message } => write!(f, "merge failed: {message}"),
        }
    }
}

/// Run the whole pipeline for one change under the run deadline
///
/// Expiry drops every in-flight platform call and yields
/// [`Error::DeadlineExceeded`].
pub async fn run_merge_pipeline(
    platform: &dyn PlatformService,
    change: &ChangeContext,
    options: &PipelineOptions,
) -> Result<MergeOutcome> {
    tokio::time::timeout(options.deadline, decide_and_merge(platform, change, options))
        .await
        .map_err(|_| Error::DeadlineExceeded(options.deadline))?
}

async fn decide_and_merge(
    platform: &dyn PlatformService,
    change: &ChangeContext,
    options: &PipelineOptions,
) -> Result<MergeOutcome> {
    let url = change.html_url();

    // =========================================================================
    // Gather
    // =========================================================================

    let policy = fetch_policy(platform, change, &options.policy_path).await?;

    debug!(%url, "pulling pull request reviews");
    let reviews = platform.list_reviews(change.pr_number).await?;

    let fresh = remove_stale_reviews(&change.head_sha, reviews);
    let verdicts = verdict_map(&fresh);

    debug!(%url, "pulling pull request files");
    let changed_files = platform.list_changed_files(change.pr_number).await?;

    // =========================================================================
    // Guards
    // =========================================================================

    if edits_policy(&changed_files, &options.policy_path) {
        warn!(%url, path = %options.policy_path, "policy file edited, skipping");
        report_status(platform, change, CommitState::Failure, POLICY_EDIT_DESCRIPTION).await;
        return Ok(MergeOutcome::PolicyEdited);
    }

    if let Some(keyword) = blocking_keyword(&policy, &change.title) {
        info!(%url, keyword, "title blocks automatic merge");
        report_status(platform, change, CommitState::Failure, TITLE_BLOCKED_DESCRIPTION).await;
        return Ok(MergeOutcome::TitleBlocked {
            keyword: keyword.to_string(),
        });
    }

    // =========================================================================
    // Evaluate
    // =========================================================================

    let rule = policy.quorum_rule();
    let agreement = evaluate_agreement(&policy.eligible_voters, &verdicts, Some(&rule));
    if !agreement.reached {
        report_status(
            platform,
            change,
            CommitState::Pending,
            &format!("Automatic merge is pending, {}", agreement.reason),
        )
        .await;
        info!(%url, reason = %agreement.reason, "agreement not reached, staying put");
        return Ok(MergeOutcome::Pending {
            reason: agreement.reason,
        });
    }

    // =========================================================================
    // Merge
    // =========================================================================

    info!(%url, method = %policy.merge_strategy, "agreement reached, merging");
    let failure = match platform
        .merge_pr(
            change.pr_number,
            &change.head_sha,
            policy.merge_strategy,
            &options.merge_message,
        )
        .await
    {
        Ok(result) if result.merged => {
            report_status(platform, change, CommitState::Success, MERGED_DESCRIPTION).await;
            info!(%url, sha = ?result.sha, "merge successful");
            return Ok(MergeOutcome::Merged { sha: result.sha });
        }
        Ok(result) => result
            .message
            .unwrap_or_else(|| "merge was not performed".to_string()),
        Err(e) => e.to_string(),
    };

    warn!(%url, message = %failure, "merge failed");
    report_status(platform, change, CommitState::Failure, MERGE_FAILED_DESCRIPTION).await;

    let comment = format!("unir was unable to merge this pull request automatically: {failure}");
    if let Err(e) = platform.create_pr_comment(change.pr_number, &comment).await {
        warn!(%url, error = %e, "failed to comment on merge failure");
    }

    Ok(MergeOutcome::MergeFailed { message: failure })
}

/// Load and parse the policy from the change's base branch
async fn fetch_policy(
    platform: &dyn PlatformService,
    change: &ChangeContext,
    policy_path: &str,
) -> Result<Policy> {
    debug!(
        owner = %change.owner,
        repo = %change.repo,
        base_ref = %change.base_ref,
        "fetching policy"
    );
    let content = platform
        .get_file_content(policy_path, &change.base_ref)
        .await?
        .ok_or_else(|| Error::PolicyNotFound {
            path: policy_path.to_string(),
            reference: change.base_ref.clone(),
        })?;
    Policy::from_yaml(&content)
}

/// Post a status on the head commit; failures are logged, never raised
async fn report_status(
    platform: &dyn PlatformService,
    change: &ChangeContext,
    state: CommitState,
    description: &str,
) {
    if let Err(e) = platform
        .create_commit_status(&change.head_sha, state, description)
        .await
    {
        warn!(
            url = %change.html_url(),
            sha = %change.head_sha,
            %state,
            error = %e,
            "creating commit status failed"
        );
    }
}
