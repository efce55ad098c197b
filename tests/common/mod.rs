//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::*;

use unir::types::{ChangeContext, PlatformConfig, PullRequestDetails, ReviewRecord, Verdict};

/// Head commit used by fixtures
pub const HEAD_SHA: &str = "def456";

/// Superseded commit used by fixtures
pub const OLD_SHA: &str = "abc123";

pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        host: None,
    }
}

pub fn make_change(pr_number: u64, title: &str) -> ChangeContext {
    ChangeContext {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        head_sha: HEAD_SHA.to_string(),
        pr_number,
        title: title.to_string(),
        base_ref: "main".to_string(),
    }
}

pub fn make_details(pr_number: u64, title: &str, head_sha: &str) -> PullRequestDetails {
    PullRequestDetails {
        number: pr_number,
        title: title.to_string(),
        head_sha: head_sha.to_string(),
        base_ref: "main".to_string(),
        html_url: format!("https://github.com/acme/widgets/pull/{pr_number}"),
    }
}

pub fn review(voter: &str, verdict: Verdict, commit: &str) -> ReviewRecord {
    ReviewRecord {
        voter: voter.to_string(),
        verdict,
        commit_id: commit.to_string(),
        html_url: format!("https://github.com/acme/widgets/pull/1#review-{voter}"),
    }
}

pub fn approve(voter: &str) -> ReviewRecord {
    review(voter, Verdict::Approve, HEAD_SHA)
}

pub fn request_changes(voter: &str) -> ReviewRecord {
    review(voter, Verdict::RequestChanges, HEAD_SHA)
}
