//! Error types for the webhook gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Reasons an inbound delivery is rejected before any pipeline runs.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `X-Hub-Signature-256` header is missing.
    #[error("missing signature header")]
    MissingSignature,

    /// The signature header is not `sha256=<hex>`.
    #[error("invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    /// HMAC verification failed.
    #[error("invalid signature")]
    InvalidSignature,

    /// The `X-GitHub-Event` header is missing.
    #[error("missing event type header")]
    MissingEventType,

    /// The body does not match the declared event type.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// HTTP status for this rejection.
    ///
    /// Signature problems are 401, malformed deliveries 400.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidSignature | Self::InvalidSignatureFormat(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::MissingEventType | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // Generic bodies only; nothing about the secret or the parse failure
        // goes back to the caller.
        let status = self.status_code();
        let body = match &self {
            Self::MissingSignature | Self::InvalidSignatureFormat(_) | Self::InvalidSignature => {
                "Secret did not match"
            }
            Self::MissingEventType | Self::InvalidPayload(_) => "Bad payload",
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::InvalidSignatureFormat("md5=00".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::MissingEventType.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidPayload("eof".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_response_uses_status_code() {
        let response = WebhookError::InvalidPayload("line 1 column 2".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
