//! Merge decision engine
//!
//! Pure decision helpers plus the effectful pipeline that drives them:
//! 1. Reconcile - drop stale reviews, reduce to one verdict per reviewer
//! 2. Guard - refuse policy edits and blocked titles
//! 3. Evaluate - apply the quorum rule
//! 4. Orchestrate - fetch, decide, report, merge

mod agreement;
mod guard;
mod orchestrate;
mod reconcile;

pub use agreement::{CONSENSUS_NEEDED, evaluate_agreement};
pub use guard::{blocking_keyword, edits_policy};
pub use orchestrate::{
    DEFAULT_RUN_TIMEOUT, MERGE_MESSAGE, MergeOutcome, PipelineOptions, run_merge_pipeline,
};
pub use reconcile::{remove_stale_reviews, verdict_map};
