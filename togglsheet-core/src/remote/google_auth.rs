//! Google service-account authentication.
//!
//! Signs a short-lived RS256 JWT assertion with the service account's private
//! key and exchanges it for a bearer access token (two-legged OAuth).

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_json, transport_error};
use crate::config::CredentialSource;
use crate::error::{SyncError, SyncResult};

const SERVICE: &str = "Google OAuth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Google caps assertion lifetime at one hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account key file that matter for auth.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> SyncResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SyncError::Config(format!("Invalid service-account key: {e}")))
    }

    pub fn load(source: &CredentialSource) -> SyncResult<Self> {
        match source {
            CredentialSource::File(path) => {
                let contents = std::fs::read_to_string(path)?;
                Self::from_json(&contents)
            }
            CredentialSource::Inline(json) => Self::from_json(json),
        }
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Signed JWT assertion for the token endpoint.
pub fn build_assertion(
    key: &ServiceAccountKey,
    scope: &str,
    now: DateTime<Utc>,
) -> SyncResult<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SyncError::Config(format!("Invalid service-account private key: {e}")))?;

    let iat = now.timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope,
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| SyncError::Config(format!("Failed to sign JWT assertion: {e}")))
}

/// A bearer token for Google APIs.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Exchange a signed assertion for an access token.
pub async fn fetch_access_token(
    http: &reqwest::Client,
    key: &ServiceAccountKey,
    scope: &str,
    timeout: Duration,
) -> SyncResult<AccessToken> {
    let now = Utc::now();
    let assertion = build_assertion(key, scope, now)?;
    debug!(client_email = %key.client_email, token_uri = %key.token_uri, "Requesting access token");

    let response = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        // The token endpoint reports bad keys and revoked accounts as 400 invalid_grant
        if status.is_client_error() {
            return Err(SyncError::Authentication(format!(
                "{SERVICE} rejected service account {} ({}): {}",
                key.client_email,
                status.as_u16(),
                body
            )));
        }
        return Err(SyncError::Api {
            service: SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    let token: TokenResponse = read_json(SERVICE, response, timeout).await?;
    Ok(AccessToken {
        token: token.access_token,
        expires_at: token
            .expires_in
            .map(|secs| now + chrono::Duration::seconds(secs)),
    })
}
