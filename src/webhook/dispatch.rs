//! Event dispatch
//!
//! Turns a classified delivery into one or more pipeline runs on a
//! background task. Runs share nothing but the factory, so two events for
//! the same pull request may race; the merge call is pinned to the head
//! commit and GitHub refuses a second merge.
//!
//! One deadline covers everything an event does: client creation (which
//! may mint an installation token), the PR search and every pipeline run.

use super::payload::{ReviewEvent, StatusEvent, WebhookEvent};
use crate::STATUS_CONTEXT;
use crate::error::{Error, Result};
use crate::merge::{PipelineOptions, run_merge_pipeline};
use crate::platform::{PlatformFactory, PlatformService};
use crate::types::ChangeContext;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Spawns a pipeline run per accepted event
pub struct Dispatcher {
    factory: Arc<dyn PlatformFactory>,
    options: PipelineOptions,
}

impl Dispatcher {
    /// Create a dispatcher
    pub fn new(factory: Arc<dyn PlatformFactory>, options: PipelineOptions) -> Self {
        Self { factory, options }
    }

    /// Handle `event` on its own task and return immediately
    ///
    /// Returns `None` for ignored events, which spawn nothing.
    pub fn dispatch(self: &Arc<Self>, event: WebhookEvent) -> Option<JoinHandle<()>> {
        if let WebhookEvent::Ignored(kind) = &event {
            debug!(event = %kind, "ignoring event");
            return None;
        }
        let this = Arc::clone(self);
        Some(tokio::spawn(async move { this.handle_event(event).await }))
    }

    /// Handle `event` to completion on the current task
    pub async fn handle_event(&self, event: WebhookEvent) {
        let expires = Instant::now() + self.options.deadline;
        match event {
            WebhookEvent::Review(review) => self.handle_review(review, expires).await,
            WebhookEvent::Status(status) => self.handle_status(status, expires).await,
            WebhookEvent::Ignored(_) => {}
        }
    }

    async fn handle_review(&self, event: ReviewEvent, expires: Instant) {
        let change = event.change_context();
        debug!(review = %event.review.html_url, action = %event.action, "handling pull request review");

        let platform = match self
            .within(
                expires,
                self.factory.create(
                    event.installation.map(|i| i.id),
                    &change.owner,
                    &change.repo,
                ),
            )
            .await
        {
            Ok(platform) => platform,
            Err(e) => {
                log_failure(&change, &e);
                return;
            }
        };

        self.run_for_change(platform.as_ref(), &change, expires).await;
    }

    async fn handle_status(&self, event: StatusEvent, expires: Instant) {
        // Our own statuses would otherwise re-trigger us forever.
        if event.context == STATUS_CONTEXT {
            return;
        }
        if event.state != "success" {
            debug!(
                target_url = event.target_url.as_deref().unwrap_or_default(),
                state = %event.state,
                "skipping unsuccessful commit status event"
            );
            return;
        }

        let owner = &event.repository.owner.login;
        let repo = &event.repository.name;

        let platform = match self
            .within(
                expires,
                self.factory
                    .create(event.installation.map(|i| i.id), owner, repo),
            )
            .await
        {
            Ok(platform) => platform,
            Err(e) => {
                error!(%owner, %repo, sha = %event.sha, error = %e, "failed to create platform client");
                return;
            }
        };

        let changes = match self
            .within(expires, changes_for_commit(platform.as_ref(), &event.sha))
            .await
        {
            Ok(changes) => changes,
            Err(e) => {
                error!(%owner, %repo, sha = %event.sha, error = %e, "error grabbing pull requests related to commit");
                return;
            }
        };

        for change in changes {
            self.run_for_change(platform.as_ref(), &change, expires).await;
        }
    }

    async fn run_for_change(
        &self,
        platform: &dyn PlatformService,
        change: &ChangeContext,
        expires: Instant,
    ) {
        let options = PipelineOptions {
            deadline: expires.saturating_duration_since(Instant::now()),
            ..self.options.clone()
        };
        match run_merge_pipeline(platform, change, &options).await {
            Ok(outcome) => info!(
                owner = %change.owner,
                repo = %change.repo,
                pr_number = change.pr_number,
                sha = %change.head_sha,
                %outcome,
                "run finished"
            ),
            Err(e) => log_failure(change, &e),
        }
    }

    /// Await `fut` unless the event's deadline passes first
    async fn within<T>(
        &self,
        expires: Instant,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout_at(expires, fut)
            .await
            .map_err(|_| Error::DeadlineExceeded(self.options.deadline))?
    }
}

/// Open PRs whose current head is `sha`
///
/// PRs whose head has since moved on are skipped; a newer event will cover
/// them.
async fn changes_for_commit(
    platform: &dyn PlatformService,
    sha: &str,
) -> Result<Vec<ChangeContext>> {
    let config = platform.config();
    let mut changes = Vec::new();

    for pr_number in platform.find_open_prs_by_commit(sha).await? {
        let details = platform.get_pr_details(pr_number).await?;
        if details.head_sha != sha {
            info!(
                pr_number,
                sha,
                url = %details.html_url,
                "commit status does not match the head SHA of its PR, skipping"
            );
            continue;
        }
        changes.push(ChangeContext {
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            head_sha: details.head_sha,
            pr_number: details.number,
            title: details.title,
            base_ref: details.base_ref,
        });
    }

    Ok(changes)
}

fn log_failure(change: &ChangeContext, error: &Error) {
    error!(
        owner = %change.owner,
        repo = %change.repo,
        pr_number = change.pr_number,
        sha = %change.head_sha,
        %error,
        "run aborted"
    );
}
