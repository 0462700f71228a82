use tracing::{debug, warn};

use super::client::DeviceAuthorizationClient;
use super::credential::Credential;
use super::error::AuthError;
use super::store::CredentialStore;

/// Gate for commands that need a live credential.
///
/// Decides authenticated / expired / absent from the store, attempting a
/// single refresh when an expired credential still carries a refresh
/// token. Both failure modes are terminal for the current command.
pub struct SessionGuard<'a> {
    store: &'a CredentialStore,
    client: &'a DeviceAuthorizationClient,
}

impl<'a> SessionGuard<'a> {
    pub fn new(store: &'a CredentialStore, client: &'a DeviceAuthorizationClient) -> Self {
        Self { store, client }
    }

    /// Return a usable credential or fail the command.
    ///
    /// `NotAuthenticated` when no credential is stored, `SessionExpired`
    /// when the stored one is stale and cannot be refreshed.
    pub async fn require_authenticated(&self) -> Result<Credential, AuthError> {
        let credential = self.store.load().ok_or(AuthError::NotAuthenticated)?;
        if !credential.is_expired() {
            return Ok(credential);
        }

        let Some(refresh_token) = credential.refresh_token.clone() else {
            return Err(AuthError::SessionExpired);
        };

        debug!("stored credential stale, attempting refresh");
        match self.client.refresh(&refresh_token).await {
            Ok(mut refreshed) => {
                // Servers may omit the refresh token on rotation; keep the old one.
                if refreshed.refresh_token.is_none() {
                    refreshed.refresh_token = Some(refresh_token);
                }
                if !self.store.save(&refreshed) {
                    warn!("refreshed credential could not be persisted; valid for this process only");
                }
                Ok(refreshed)
            }
            Err(err) => {
                debug!(error = %err, "refresh failed");
                Err(AuthError::SessionExpired)
            }
        }
    }
}
