//! GitHub App installation tokens
//!
//! An App authenticates with a short-lived RS256 JWT and exchanges it for
//! an installation token scoped to the installation that sent the event.

use crate::error::{Error, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Sign an App JWT valid for ten minutes from `now` (seconds since epoch)
pub fn generate_app_jwt(app_id: u64, private_key: &str, now: u64) -> Result<String> {
    #[derive(Debug, Serialize)]
    struct Claims {
        iat: u64,
        exp: u64,
        iss: String,
    }

    // Backdate to tolerate clock drift against GitHub.
    let claims = Claims {
        iat: now.saturating_sub(60),
        exp: now + 600,
        iss: app_id.to_string(),
    };
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .map_err(|e| Error::Auth(format!("invalid App private key: {e}")))?;

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| Error::Auth(format!("failed to sign App JWT: {e}")))
}

/// Exchange an App JWT for an installation access token
pub async fn mint_installation_token(
    http_client: &Client,
    api_base_url: &str,
    app_id: u64,
    private_key: &str,
    installation_id: u64,
) -> Result<String> {
    #[derive(Deserialize)]
    struct InstallationTokenResponse {
        token: String,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Auth(e.to_string()))?
        .as_secs();
    let jwt = generate_app_jwt(app_id, private_key, now)?;

    let endpoint = format!(
        "{}/app/installations/{installation_id}/access_tokens",
        api_base_url.trim_end_matches('/')
    );
    debug!(installation_id, "minting installation token");

    let response = http_client
        .post(&endpoint)
        .header("Authorization", format!("Bearer {jwt}"))
        .header("Accept", "application/vnd.github+json")
        .header("X-GitHub-Api-Version", "2022-11-28")
        .send()
        .await
        .map_err(|e| Error::Auth(format!("installation token request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Auth(format!(
            "installation token request for {installation_id} returned {}",
            response.status()
        )));
    }

    let body: InstallationTokenResponse = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("failed to parse installation token: {e}")))?;
    Ok(body.token)
}
