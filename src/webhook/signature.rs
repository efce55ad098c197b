//! `X-Hub-Signature-256` verification

use super::error::WebhookError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

fn digest(secret: &[u8], body: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| WebhookError::InvalidSignatureFormat(e.to_string()))?;
    mac.update(body);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Signature GitHub would send for `body` under `secret`
pub fn sign_payload(secret: &[u8], body: &[u8]) -> Result<String, WebhookError> {
    Ok(format!("{SIGNATURE_PREFIX}{}", hex::encode(digest(secret, body)?)))
}

/// Check `header` against the HMAC of the raw `body`
pub fn verify_signature(
    secret: &[u8],
    header: Option<&str>,
    body: &[u8],
) -> Result<(), WebhookError> {
    let header = header.ok_or(WebhookError::MissingSignature)?;
    let encoded = header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| WebhookError::InvalidSignatureFormat("expected sha256= prefix".into()))?;
    let provided = hex::decode(encoded)
        .map_err(|e| WebhookError::InvalidSignatureFormat(e.to_string()))?;

    let expected = digest(secret, body)?;

    if provided.len() != expected.len() {
        return Err(WebhookError::InvalidSignature);
    }
    if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}
