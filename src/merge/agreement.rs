//! Agreement evaluation - pure quorum arithmetic
//!
//! No I/O happens here. Voters and verdicts are passed in, so every
//! policy combination can be unit tested directly.

use crate::policy::QuorumRule;
use crate::types::{AgreementResult, Verdict};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Reason reported when a veto blocks the merge
pub const CONSENSUS_NEEDED: &str = "consensus needed";

/// Decide whether `voters` agree under `rule`
///
/// `verdicts` must be keyed by lowercased login (see
/// [`verdict_map`](crate::merge::verdict_map)). Only logins in `voters` are
/// consulted; voters without a verdict abstain. With no rule the default of
/// one approval and no dissent applies.
#[must_use]
pub fn evaluate_agreement<S: BuildHasher>(
    voters: &[String],
    verdicts: &HashMap<String, Verdict, S>,
    rule: Option<&QuorumRule>,
) -> AgreementResult {
    let rule = rule.copied().unwrap_or_default();
    let mut approvals: u32 = 0;

    for voter in voters {
        match verdicts.get(&voter.to_lowercase()) {
            Some(Verdict::Approve) => approvals += 1,
            Some(Verdict::RequestChanges) if rule.require_unanimity => {
                return AgreementResult::pending(CONSENSUS_NEEDED);
            }
            _ => {}
        }
    }

    if approvals >= rule.approval_threshold {
        AgreementResult::reached()
    } else {
        AgreementResult::pending(format!(
            "{} more approval(s) needed",
            rule.approval_threshold - approvals
        ))
    }
}
