//! Review reconciliation
//!
//! Reviews against a superseded head must not count, so staleness is
//! filtered before reviews are reduced to one verdict per reviewer.

use crate::types::{ReviewRecord, Verdict};
use std::collections::HashMap;
use tracing::debug;

/// Keep only reviews submitted against `head_sha`, preserving order
#[must_use]
pub fn remove_stale_reviews(head_sha: &str, reviews: Vec<ReviewRecord>) -> Vec<ReviewRecord> {
    reviews
        .into_iter()
        .filter(|review| {
            let fresh = review.commit_id == head_sha;
            if !fresh {
                debug!(
                    review = %review.html_url,
                    commit = %review.commit_id,
                    "skipping review, sha does not match latest"
                );
            }
            fresh
        })
        .collect()
}

/// Reduce reviews to the latest verdict per (lowercased) reviewer
///
/// Reviews are expected in the platform's chronological order. Reviews that
/// neither approve nor request changes are dropped, so a later comment does
/// not erase an earlier approval.
#[must_use]
pub fn verdict_map(reviews: &[ReviewRecord]) -> HashMap<String, Verdict> {
    let mut verdicts = HashMap::new();
    for review in reviews {
        if matches!(review.verdict, Verdict::Approve | Verdict::RequestChanges) {
            verdicts.insert(review.voter.to_lowercase(), review.verdict);
        }
    }
    verdicts
}
