//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use unir::error::{Error, Result};
use unir::platform::{PlatformFactory, PlatformService};
use unir::types::{
    CommitState, MergeMethod, MergeResult, PlatformConfig, PullRequestDetails, ReviewRecord,
};

/// Call record for `create_commit_status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCall {
    pub sha: String,
    pub state: CommitState,
    pub description: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub sha: String,
    pub method: MergeMethod,
    pub message: String,
}

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `get_file_content`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetFileCall {
    pub path: String,
    pub reference: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Canned reviews, files, PR details and search results
/// - Call tracking for verification
/// - Error injection for failure path testing
/// - Artificial latency for deadline testing
pub struct MockPlatformService {
    config: PlatformConfig,
    reviews: Mutex<Vec<ReviewRecord>>,
    changed_files: Mutex<Vec<String>>,
    file_contents: Mutex<HashMap<(String, String), String>>,
    prs_by_commit: Mutex<HashMap<String, Vec<u64>>>,
    pr_details: Mutex<HashMap<u64, PullRequestDetails>>,
    merge_response: Mutex<MergeResult>,
    review_latency: Mutex<Option<Duration>>,
    // Call tracking
    list_reviews_calls: Mutex<Vec<u64>>,
    list_files_calls: Mutex<Vec<u64>>,
    get_file_calls: Mutex<Vec<GetFileCall>>,
    status_calls: Mutex<Vec<StatusCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    search_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_list_reviews: Mutex<Option<String>>,
    error_on_list_files: Mutex<Option<String>>,
    error_on_get_file: Mutex<Option<String>>,
    error_on_status: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
    error_on_comment: Mutex<Option<String>>,
    error_on_search: Mutex<Option<String>>,
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    slot.lock()
        .unwrap()
        .clone()
        .map_or(Ok(()), |msg| Err(Error::GitHubApi(msg)))
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            reviews: Mutex::new(Vec::new()),
            changed_files: Mutex::new(Vec::new()),
            file_contents: Mutex::new(HashMap::new()),
            prs_by_commit: Mutex::new(HashMap::new()),
            pr_details: Mutex::new(HashMap::new()),
            merge_response: Mutex::new(MergeResult {
                merged: true,
                sha: Some("merge_sha".to_string()),
                message: None,
            }),
            review_latency: Mutex::new(None),
            list_reviews_calls: Mutex::new(Vec::new()),
            list_files_calls: Mutex::new(Vec::new()),
            get_file_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
            error_on_list_reviews: Mutex::new(None),
            error_on_list_files: Mutex::new(None),
            error_on_get_file: Mutex::new(None),
            error_on_status: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
            error_on_comment: Mutex::new(None),
            error_on_search: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Commit `content` as the file at `path` on `reference`
    pub fn set_file(&self, path: &str, reference: &str, content: &str) {
        self.file_contents.lock().unwrap().insert(
            (path.to_string(), reference.to_string()),
            content.to_string(),
        );
    }

    /// Commit a `.unir.yml` on `main`
    pub fn set_policy(&self, yaml: &str) {
        self.set_file(".unir.yml", "main", yaml);
    }

    /// Set the reviews returned by `list_reviews`
    pub fn set_reviews(&self, reviews: Vec<ReviewRecord>) {
        *self.reviews.lock().unwrap() = reviews;
    }

    /// Set the files returned by `list_changed_files`
    pub fn set_changed_files(&self, files: &[&str]) {
        *self.changed_files.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    /// Set the PRs returned by `find_open_prs_by_commit` for `sha`
    pub fn set_prs_for_commit(&self, sha: &str, prs: Vec<u64>) {
        self.prs_by_commit
            .lock()
            .unwrap()
            .insert(sha.to_string(), prs);
    }

    /// Set the response for `get_pr_details`
    pub fn set_pr_details(&self, details: PullRequestDetails) {
        self.pr_details
            .lock()
            .unwrap()
            .insert(details.number, details);
    }

    /// Set the response for `merge_pr`
    pub fn set_merge_response(&self, result: MergeResult) {
        *self.merge_response.lock().unwrap() = result;
    }

    /// Make `list_reviews` take `latency` before answering
    pub fn delay_reviews(&self, latency: Duration) {
        *self.review_latency.lock().unwrap() = Some(latency);
    }

    // === Error injection methods ===

    pub fn fail_list_reviews(&self, msg: &str) {
        *self.error_on_list_reviews.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_list_files(&self, msg: &str) {
        *self.error_on_list_files.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_get_file(&self, msg: &str) {
        *self.error_on_get_file.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_status(&self, msg: &str) {
        *self.error_on_status.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_comment(&self, msg: &str) {
        *self.error_on_comment.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_search(&self, msg: &str) {
        *self.error_on_search.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    pub fn list_reviews_calls(&self) -> Vec<u64> {
        self.list_reviews_calls.lock().unwrap().clone()
    }

    pub fn list_files_calls(&self) -> Vec<u64> {
        self.list_files_calls.lock().unwrap().clone()
    }

    pub fn get_file_calls(&self) -> Vec<GetFileCall> {
        self.get_file_calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<StatusCall> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    pub fn create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Assert no side effect reached the platform
    pub fn assert_no_side_effects(&self) {
        assert!(self.status_calls().is_empty(), "unexpected status");
        assert!(self.merge_pr_calls().is_empty(), "unexpected merge");
        assert!(self.create_comment_calls().is_empty(), "unexpected comment");
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<ReviewRecord>> {
        self.list_reviews_calls.lock().unwrap().push(pr_number);
        let latency = *self.review_latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        injected(&self.error_on_list_reviews)?;
        Ok(self.reviews.lock().unwrap().clone())
    }

    async fn list_changed_files(&self, pr_number: u64) -> Result<Vec<String>> {
        self.list_files_calls.lock().unwrap().push(pr_number);
        injected(&self.error_on_list_files)?;
        Ok(self.changed_files.lock().unwrap().clone())
    }

    async fn get_file_content(&self, path: &str, reference: &str) -> Result<Option<String>> {
        self.get_file_calls.lock().unwrap().push(GetFileCall {
            path: path.to_string(),
            reference: reference.to_string(),
        });
        injected(&self.error_on_get_file)?;
        Ok(self
            .file_contents
            .lock()
            .unwrap()
            .get(&(path.to_string(), reference.to_string()))
            .cloned())
    }

    async fn create_commit_status(
        &self,
        sha: &str,
        state: CommitState,
        description: &str,
    ) -> Result<()> {
        self.status_calls.lock().unwrap().push(StatusCall {
            sha: sha.to_string(),
            state,
            description: description.to_string(),
        });
        injected(&self.error_on_status)
    }

    async fn merge_pr(
        &self,
        pr_number: u64,
        sha: &str,
        method: MergeMethod,
        message: &str,
    ) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number,
            sha: sha.to_string(),
            method,
            message: message.to_string(),
        });
        injected(&self.error_on_merge_pr)?;
        Ok(self.merge_response.lock().unwrap().clone())
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number,
                body: body.to_string(),
            });
        injected(&self.error_on_comment)
    }

    async fn find_open_prs_by_commit(&self, sha: &str) -> Result<Vec<u64>> {
        self.search_calls.lock().unwrap().push(sha.to_string());
        injected(&self.error_on_search)?;
        Ok(self
            .prs_by_commit
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails> {
        self.pr_details
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// Call record for `PlatformFactory::create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCall {
    pub installation_id: Option<u64>,
    pub owner: String,
    pub repo: String,
}

/// Factory handing out one shared mock
pub struct MockPlatformFactory {
    platform: Arc<MockPlatformService>,
    create_calls: Mutex<Vec<CreateCall>>,
    error_on_create: Mutex<Option<String>>,
    create_latency: Mutex<Option<Duration>>,
}

impl MockPlatformFactory {
    pub fn new(platform: Arc<MockPlatformService>) -> Self {
        Self {
            platform,
            create_calls: Mutex::new(Vec::new()),
            error_on_create: Mutex::new(None),
            create_latency: Mutex::new(None),
        }
    }

    /// Make `create` take `latency` before answering (a stalled token exchange)
    pub fn delay_create(&self, latency: Duration) {
        *self.create_latency.lock().unwrap() = Some(latency);
    }

    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    pub fn create_calls(&self) -> Vec<CreateCall> {
        self.create_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformFactory for MockPlatformFactory {
    async fn create(
        &self,
        installation_id: Option<u64>,
        owner: &str,
        repo: &str,
    ) -> Result<Arc<dyn PlatformService>> {
        self.create_calls.lock().unwrap().push(CreateCall {
            installation_id,
            owner: owner.to_string(),
            repo: repo.to_string(),
        });
        let latency = *self.create_latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(msg) = self.error_on_create.lock().unwrap().clone() {
            return Err(Error::Auth(msg));
        }
        let platform: Arc<dyn PlatformService> = self.platform.clone();
        Ok(platform)
    }
}
