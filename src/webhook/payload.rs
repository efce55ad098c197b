//! Webhook payloads
//!
//! Only the fields the pipeline needs are modelled; GitHub sends far more.

use super::error::WebhookError;
use crate::types::ChangeContext;
use serde::Deserialize;

/// Header naming the delivery's event type
pub const EVENT_HEADER: &str = "x-github-event";

/// A classified delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A pull request review was submitted, edited or dismissed
    Review(ReviewEvent),
    /// A commit status changed
    Status(StatusEvent),
    /// Any other event type; accepted and dropped
    Ignored(String),
}

impl WebhookEvent {
    /// Classify a delivery by its declared event type
    pub fn parse(event_type: &str, body: &[u8]) -> Result<Self, WebhookError> {
        match event_type {
            "pull_request_review" => serde_json::from_slice(body)
                .map(Self::Review)
                .map_err(|e| WebhookError::InvalidPayload(e.to_string())),
            "status" => serde_json::from_slice(body)
                .map(Self::Status)
                .map_err(|e| WebhookError::InvalidPayload(e.to_string())),
            other => Ok(Self::Ignored(other.to_string())),
        }
    }
}

/// Account reference (`login` only)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Login name
    pub login: String,
}

/// Repository the event belongs to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    /// Repository name
    pub name: String,
    /// Owning user or organization
    pub owner: Account,
}

/// GitHub App installation that sent the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Installation {
    /// Installation id
    pub id: u64,
}

/// Branch tip reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_field: String,
    /// Commit at the tip
    pub sha: String,
}

/// Pull request embedded in a review event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestPayload {
    /// PR number
    pub number: u64,
    /// PR title
    #[serde(default)]
    pub title: String,
    /// Head branch
    pub head: GitRef,
    /// Base branch
    pub base: GitRef,
}

/// Review embedded in a review event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewPayload {
    /// Web URL of the review
    #[serde(default)]
    pub html_url: String,
}

/// `pull_request_review` delivery
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewEvent {
    /// submitted, edited or dismissed
    #[serde(default)]
    pub action: String,
    /// The review
    pub review: ReviewPayload,
    /// The reviewed pull request
    pub pull_request: PullRequestPayload,
    /// Repository
    pub repository: Repository,
    /// Sending installation (absent for plain repository webhooks)
    pub installation: Option<Installation>,
}

impl ReviewEvent {
    /// The change this review is about
    pub fn change_context(&self) -> ChangeContext {
        ChangeContext {
            owner: self.repository.owner.login.clone(),
            repo: self.repository.name.clone(),
            head_sha: self.pull_request.head.sha.clone(),
            pr_number: self.pull_request.number,
            title: self.pull_request.title.clone(),
            base_ref: self.pull_request.base.ref_field.clone(),
        }
    }
}

/// `status` delivery
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusEvent {
    /// Commit the status was posted on
    pub sha: String,
    /// pending, success, failure or error
    pub state: String,
    /// Status context (the reporting system's name)
    #[serde(default)]
    pub context: String,
    /// Link attached to the status
    pub target_url: Option<String>,
    /// Repository
    pub repository: Repository,
    /// Sending installation (absent for plain repository webhooks)
    pub installation: Option<Installation>,
}
