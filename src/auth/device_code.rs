use chrono::{DateTime, Utc};

use super::Credential;

/// Device-authorization session details for one login attempt.
///
/// Lives only in memory; destroyed when the attempt ends. The
/// `device_code` is opaque and never shown to the user, the `user_code`
/// is what the user types into the verification page.
#[derive(Debug, Clone)]
pub struct DeviceCodeSession {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub interval_secs: u64,
    pub expires_at: DateTime<Utc>,
}

impl DeviceCodeSession {
    /// The URL to show the user, preferring the pre-filled variant.
    pub fn display_uri(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }
}

/// Outcome of a single token poll.
#[derive(Debug, Clone)]
pub enum DeviceCodePoll {
    /// Authorization still pending; keep polling at the current interval.
    Pending,
    /// Server asked to slow down; widen the interval before the next poll.
    SlowDown,
    /// User authorized; credential is ready.
    Authorized { credential: Credential },
    /// User denied the request. Terminal.
    Denied,
    /// The device code's lifetime elapsed. Terminal.
    Expired,
}

/// Lifecycle of a login attempt. Transitions are forward-only; once a
/// terminal state is reached, no further poll is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Authorized,
    Denied,
    Expired,
    Aborted,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Pending)
    }
}
