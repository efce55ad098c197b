//! Webhook gateway
//!
//! Verifies each delivery, classifies it and hands it to the
//! [`Dispatcher`]. The request returns as soon as the run is spawned.

mod dispatch;
mod error;
mod payload;
mod signature;

pub use dispatch::Dispatcher;
pub use error::WebhookError;
pub use payload::{
    Account, EVENT_HEADER, GitRef, Installation, PullRequestPayload, Repository, ReviewEvent,
    ReviewPayload, StatusEvent, WebhookEvent,
};
pub use signature::{SIGNATURE_HEADER, sign_payload, verify_signature};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared state for the gateway routes
#[derive(Clone)]
pub struct GatewayState {
    secret: Arc<[u8]>,
    dispatcher: Arc<Dispatcher>,
}

impl GatewayState {
    /// Create gateway state
    pub fn new(secret: &[u8], dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            secret: Arc::from(secret),
            dispatcher,
        }
    }
}

/// Build the gateway router
///
/// - `POST /` receives deliveries
/// - `GET /healthz` answers liveness probes
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", post(handle_webhook))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn handle_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    debug!("received webhook delivery");

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(e) = verify_signature(&state.secret, signature, &body) {
        warn!(error = %e, "failed to validate webhook secret");
        return Err(e);
    }

    let event_type = headers
        .get(EVENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(WebhookError::MissingEventType)?;
    let event = WebhookEvent::parse(event_type, &body).inspect_err(|e| {
        warn!(event = event_type, error = %e, "failed to parse webhook");
    })?;

    // Detached: the run reports its own outcome.
    state.dispatcher.dispatch(event);
    Ok(StatusCode::OK)
}

async fn healthz() -> &'static str {
    "ok"
}
