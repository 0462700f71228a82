use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::debug;

use super::client::PollToken;
use super::credential::Credential;
use super::device_code::{DeviceCodePoll, DeviceCodeSession, SessionStatus};
use super::error::AuthError;

/// How much to widen the polling interval on each `slow_down` signal.
/// Cumulative: n signals add 5n seconds.
const SLOW_DOWN_INCREMENT_SECS: u64 = 5;

/// Terminal result of a completed polling run.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// User approved; the credential has not been persisted yet.
    Authorized(Credential),
    /// User rejected the authorization request.
    Denied,
    /// The device code's lifetime elapsed before approval.
    Expired,
}

impl LoginOutcome {
    pub fn status(&self) -> SessionStatus {
        match self {
            LoginOutcome::Authorized(_) => SessionStatus::Authorized,
            LoginOutcome::Denied => SessionStatus::Denied,
            LoginOutcome::Expired => SessionStatus::Expired,
        }
    }
}

/// Drives repeated token polls for one device-authorization session until
/// a terminal outcome.
///
/// Three details here keep the remote server happy and must not change:
/// the first sleep happens *before* the first poll (the server's stated
/// minimum interval applies from code issuance), `slow_down` widens the
/// interval cumulatively, and the session's `expires_at` is checked on
/// every iteration so polling cannot outlive the device code.
///
/// A transport or protocol error aborts the attempt: one clear failure
/// beats silent infinite retry on a broken network.
pub struct DevicePoller<'a> {
    client: &'a dyn PollToken,
}

impl<'a> DevicePoller<'a> {
    pub fn new(client: &'a dyn PollToken) -> Self {
        Self { client }
    }

    /// Poll until the session reaches a terminal state.
    ///
    /// Cancellable at every suspension point (the interval sleep and the
    /// network call); dropping the future leaves no state behind.
    pub async fn run(&self, session: &DeviceCodeSession) -> Result<LoginOutcome, AuthError> {
        let mut interval = Duration::from_secs(session.interval_secs);
        let mut polls: u32 = 0;
        // Pin the wall-clock expiry to the timer clock once, so the
        // deadline and the sleeps always agree.
        let remaining = (session.expires_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let deadline = Instant::now() + remaining;

        loop {
            tokio::time::sleep(interval).await;

            if Instant::now() >= deadline {
                debug!(polls, "device code expired before authorization");
                return Ok(LoginOutcome::Expired);
            }

            polls += 1;
            match self.client.poll_token(session).await? {
                DeviceCodePoll::Authorized { credential } => {
                    debug!(polls, "device authorization granted");
                    return Ok(LoginOutcome::Authorized(credential));
                }
                DeviceCodePoll::Pending => {}
                DeviceCodePoll::SlowDown => {
                    interval += Duration::from_secs(SLOW_DOWN_INCREMENT_SECS);
                    debug!(interval_secs = interval.as_secs(), "server asked to slow down");
                }
                DeviceCodePoll::Denied => {
                    debug!(polls, "device authorization denied");
                    return Ok(LoginOutcome::Denied);
                }
                DeviceCodePoll::Expired => {
                    debug!(polls, "server reported expired device code");
                    return Ok(LoginOutcome::Expired);
                }
            }
        }
    }
}
