//! GitHub platform service implementation

use crate::STATUS_CONTEXT;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CommitState, MergeMethod, MergeResult, PlatformConfig, PullRequestDetails, ReviewRecord,
    Verdict,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::pulls::{Review, ReviewState};
use octocrab::models::repos::DiffEntry;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

/// GitHub rejects status descriptions longer than this
const MAX_STATUS_DESCRIPTION: usize = 140;

/// REST root for github.com or a GitHub Enterprise host
pub(crate) fn api_base_url(host: Option<&str>) -> String {
    host.map_or_else(
        || "https://api.github.com".to_string(),
        |h| format!("https://{h}/api/v3"),
    )
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Installation or personal token, reused for raw requests
    token: String,
    /// Client for the endpoints octocrab does not cover (statuses, raw contents)
    http_client: Client,
    /// REST root, see [`api_base_url`]
    api_base: String,
}

impl GitHubService {
    /// Create a service scoped to the repository in `config`
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let api_base = api_base_url(config.host.as_deref());
        debug!(owner = %config.owner, repo = %config.repo, %api_base, "building GitHub client");

        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if config.host.is_some() {
            builder = builder
                .base_uri(api_base.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }
        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("unir")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{suffix}",
            self.api_base, self.config.owner, self.config.repo
        )
    }
}

/// Helper to convert an octocrab review to our `ReviewRecord` type
///
/// Reviews without an author or commit (deleted users, pending drafts) are
/// dropped.
fn review_from_octocrab(review: Review) -> Option<ReviewRecord> {
    let voter = review.user?.login;
    let commit_id = review.commit_id?;
    let verdict = match review.state {
        Some(ReviewState::Approved) => Verdict::Approve,
        Some(ReviewState::ChangesRequested) => Verdict::RequestChanges,
        _ => Verdict::NoVerdict,
    };
    Some(ReviewRecord {
        voter,
        verdict,
        commit_id,
        html_url: review.html_url.to_string(),
    })
}

/// Pull the human-readable message out of an octocrab error
fn octocrab_message(error: &octocrab::Error) -> String {
    match error {
        octocrab::Error::GitHub { source, .. } => source.message.clone(),
        other => other.to_string(),
    }
}

/// Clamp a status description to GitHub's limit
pub(crate) fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_STATUS_DESCRIPTION {
        return description.to_string();
    }
    let mut truncated: String = description
        .chars()
        .take(MAX_STATUS_DESCRIPTION - 3)
        .collect();
    truncated.push_str("...");
    truncated
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<ReviewRecord>> {
        debug!(pr_number, "listing PR reviews");
        let mut page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_reviews(pr_number)
            .per_page(100)
            .send()
            .await?;

        let mut reviews = Vec::new();
        loop {
            reviews.extend(page.items.into_iter().filter_map(review_from_octocrab));
            match self.client.get_page::<Review>(&page.next).await? {
                Some(next) => page = next,
                None => break,
            }
        }

        debug!(pr_number, count = reviews.len(), "listed PR reviews");
        Ok(reviews)
    }

    async fn list_changed_files(&self, pr_number: u64) -> Result<Vec<String>> {
        debug!(pr_number, "listing PR files");
        let mut page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_files(pr_number)
            .await?;

        let mut files = Vec::new();
        loop {
            files.extend(page.items.into_iter().map(|entry| entry.filename));
            match self.client.get_page::<DiffEntry>(&page.next).await? {
                Some(next) => page = next,
                None => break,
            }
        }

        debug!(pr_number, count = files.len(), "listed PR files");
        Ok(files)
    }

    async fn get_file_content(&self, path: &str, reference: &str) -> Result<Option<String>> {
        debug!(path, reference, "fetching file content");
        let response = self
            .http_client
            .get(self.repo_url(&format!("contents/{path}")))
            .query(&[("ref", reference)])
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github.raw+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch {path}: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(path, reference, "file not found");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Fetching {path} at {reference} returned {}",
                response.status()
            )));
        }

        let content = response
            .text()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to read {path}: {e}")))?;
        Ok(Some(content))
    }

    async fn create_commit_status(
        &self,
        sha: &str,
        state: CommitState,
        description: &str,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct StatusRequest<'a> {
            state: CommitState,
            description: String,
            context: &'a str,
        }

        debug!(sha, %state, "creating commit status");
        let response = self
            .http_client
            .post(self.repo_url(&format!("statuses/{sha}")))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&StatusRequest {
                state,
                description: truncate_description(description),
                context: STATUS_CONTEXT,
            })
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to create commit status: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Creating commit status returned {}",
                response.status()
            )));
        }
        debug!(sha, %state, "created commit status");
        Ok(())
    }

    async fn merge_pr(
        &self,
        pr_number: u64,
        sha: &str,
        method: MergeMethod,
        message: &str,
    ) -> Result<MergeResult> {
        debug!(pr_number, sha, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .sha(sha)
            .message(message)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {}", octocrab_message(&e))))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn find_open_prs_by_commit(&self, sha: &str) -> Result<Vec<u64>> {
        // Only the first page is read; more than 100 open PRs sharing one
        // commit is not a case worth paginating for.
        let query = format!(
            "is:pr is:open sort:updated-desc sha:{sha} repo:{}/{}",
            self.config.owner, self.config.repo
        );
        debug!(%query, "searching PRs by commit");

        let results = self
            .client
            .search()
            .issues_and_pull_requests(&query)
            .per_page(100)
            .send()
            .await?;

        let numbers: Vec<u64> = results.items.iter().map(|issue| issue.number).collect();
        debug!(sha, count = numbers.len(), "found PRs for commit");
        Ok(numbers)
    }

    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails> {
        debug!(pr_number, "getting PR details");

        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let details = PullRequestDetails {
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            head_sha: pr.head.sha.clone(),
            base_ref: pr.base.ref_field.clone(),
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };

        debug!(pr_number, head_sha = %details.head_sha, "got PR details");
        Ok(details)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
