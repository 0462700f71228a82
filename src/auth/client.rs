use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::credential::Credential;
use super::device_code::{DeviceCodePoll, DeviceCodeSession};
use super::error::AuthError;

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Per-request timeout so one stalled call cannot silently block past the
/// session deadline.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Seam between the polling scheduler and the wire protocol, so the
/// scheduler can be exercised with scripted pollers in tests.
#[async_trait]
pub trait PollToken: Send + Sync {
    async fn poll_token(&self, session: &DeviceCodeSession) -> Result<DeviceCodePoll, AuthError>;
}

/// Client for the OAuth 2.0 Device Authorization Grant endpoints.
///
/// Pure protocol logic: no UI, and no credential-store side effects.
/// Persisting the token after a successful poll is the caller's job.
///
/// # Example
/// ```no_run
/// use zyra::auth::DeviceAuthorizationClient;
///
/// # async fn example() -> Result<(), zyra::auth::AuthError> {
/// let client = DeviceAuthorizationClient::new(
///     "http://localhost:3005".to_string(),
///     "my-client-id".to_string(),
/// );
/// let session = client.request_code("openid profile email").await?;
/// println!("Visit {} and enter {}", session.display_uri(), session.user_code);
/// # Ok(())
/// # }
/// ```
pub struct DeviceAuthorizationClient {
    client: reqwest::Client,
    client_id: String,
    device_code_url: String,
    device_token_url: String,
    user_info_url: String,
}

impl DeviceAuthorizationClient {
    pub fn new(server_url: String, client_id: String) -> Self {
        let base = server_url.trim_end_matches('/');
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            client_id,
            device_code_url: format!("{base}/device/code"),
            device_token_url: format!("{base}/device/token"),
            user_info_url: format!("{base}/api/me"),
        }
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_device_token_url(mut self, url: impl Into<String>) -> Self {
        self.device_token_url = url.into();
        self
    }

    pub fn with_user_info_url(mut self, url: impl Into<String>) -> Self {
        self.user_info_url = url.into();
        self
    }

    /// Request a device code for a new login attempt.
    ///
    /// Any transport failure, non-success status, or unusable body is an
    /// [`AuthError::AuthorizationRequest`]: the attempt is over, the caller
    /// must not retry.
    pub async fn request_code(&self, scope: &str) -> Result<DeviceCodeSession, AuthError> {
        let resp = self
            .client
            .post(&self.device_code_url)
            .json(&serde_json::json!({
                "client_id": self.client_id,
                "scope": scope,
            }))
            .send()
            .await
            .map_err(|err| AuthError::AuthorizationRequest(err.to_string()))?;
        if !resp.status().is_success() {
            return Err(AuthError::AuthorizationRequest(format!(
                "device code request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceCodeResponse = resp
            .json()
            .await
            .map_err(|err| AuthError::AuthorizationRequest(err.to_string()))?;

        debug!(user_code = %payload.user_code, "device authorization requested");
        Ok(DeviceCodeSession {
            device_code: payload.device_code,
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            verification_uri_complete: payload.verification_uri_complete,
            interval_secs: payload.interval.unwrap_or(DEFAULT_INTERVAL_SECS),
            expires_at: Utc::now() + chrono::Duration::seconds(payload.expires_in as i64),
        })
    }

    /// Refresh an expired credential using its refresh token.
    ///
    /// One shot; the guard falls back to requiring a fresh login when this
    /// fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Credential, AuthError> {
        let resp = self
            .client
            .post(&self.device_token_url)
            .json(&serde_json::json!({
                "grant_type": "refresh_token",
                "refresh_token": refresh_token,
                "client_id": self.client_id,
            }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::SessionExpired);
        }
        let payload: DeviceTokenResponse = resp.json().await?;
        match payload.access_token {
            Some(access_token) => Ok(build_credential(
                access_token,
                payload.refresh_token,
                payload.token_type,
                payload.scope,
                payload.expires_in,
            )),
            None => Err(AuthError::SessionExpired),
        }
    }

    /// Look up the authenticated user behind an access token.
    pub async fn fetch_user(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        let resp = self
            .client
            .get(&self.user_info_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "user lookup failed with status {}",
                resp.status()
            )));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl PollToken for DeviceAuthorizationClient {
    /// Poll the token endpoint once for this session.
    ///
    /// Expected protocol outcomes (`authorization_pending`, `slow_down`,
    /// `access_denied`, `expired_token`, or a token) come back as
    /// [`DeviceCodePoll`] variants; anything else is an error that ends
    /// the attempt.
    async fn poll_token(&self, session: &DeviceCodeSession) -> Result<DeviceCodePoll, AuthError> {
        let resp = self
            .client
            .post(&self.device_token_url)
            .json(&serde_json::json!({
                "grant_type": DEVICE_CODE_GRANT,
                "device_code": session.device_code,
                "client_id": self.client_id,
            }))
            .send()
            .await?;
        let payload: DeviceTokenResponse = resp.json().await?;

        if let Some(access_token) = payload.access_token {
            let credential = build_credential(
                access_token,
                payload.refresh_token,
                payload.token_type,
                payload.scope,
                payload.expires_in,
            );
            return Ok(DeviceCodePoll::Authorized { credential });
        }
        match payload.error.as_deref() {
            Some("authorization_pending") => Ok(DeviceCodePoll::Pending),
            Some("slow_down") => Ok(DeviceCodePoll::SlowDown),
            Some("access_denied") => Ok(DeviceCodePoll::Denied),
            Some("expired_token") => Ok(DeviceCodePoll::Expired),
            Some(other) => Err(AuthError::InvalidResponse(format!(
                "device token error: {}",
                payload
                    .error_description
                    .as_deref()
                    .unwrap_or(other)
            ))),
            None => Err(AuthError::InvalidResponse(
                "device token response missing token and error".to_string(),
            )),
        }
    }
}

/// User record returned by the auth server's session-verifier endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

fn build_credential(
    access_token: String,
    refresh_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
) -> Credential {
    let mut credential = Credential::new(access_token, refresh_token, scope, expires_in);
    if let Some(token_type) = token_type {
        credential.token_type = token_type;
    }
    credential
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    verification_uri_complete: Option<String>,
    interval: Option<u64>,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct DeviceTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
    error_description: Option<String>,
}
