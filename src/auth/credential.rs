use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Treat a credential as expired once it has less than this much life left,
/// so a token never expires mid-request.
const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// OAuth credential persisted by [`CredentialStore`](super::CredentialStore).
///
/// At most one credential exists per installation; a successful login
/// replaces it wholesale. `expires_at` of `None` is treated as expired.
///
/// # Example
/// ```no_run
/// use zyra::auth::Credential;
///
/// let credential = Credential::new("access".to_string(), Some("refresh".to_string()), None, Some(3600));
/// assert!(!credential.is_expired());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub scope: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Credential {
    /// Build a credential issued now, computing `expires_at` from the
    /// server-reported `expires_in` (seconds).
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        scope: Option<String>,
        expires_in: Option<u64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            access_token,
            refresh_token,
            token_type: default_token_type(),
            scope,
            expires_at: expires_in.map(|secs| now + Duration::seconds(secs as i64)),
            created_at: now,
        }
    }

    /// Whether this credential should be considered expired.
    ///
    /// True when `expires_at` is absent or less than the 5-minute safety
    /// margin away.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - Utc::now() < Duration::minutes(EXPIRY_MARGIN_MINUTES),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential_expiring_at(expires_at: Option<DateTime<Utc>>) -> Credential {
        Credential {
            access_token: "access".to_string(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            scope: None,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_expiry_is_expired() {
        assert!(credential_expiring_at(None).is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let credential = credential_expiring_at(Some(Utc::now() - Duration::hours(1)));
        assert!(credential.is_expired());
    }

    #[test]
    fn expiry_within_margin_is_expired() {
        let credential = credential_expiring_at(Some(Utc::now() + Duration::minutes(3)));
        assert!(credential.is_expired());
    }

    #[test]
    fn expiry_beyond_margin_is_fresh() {
        let credential = credential_expiring_at(Some(Utc::now() + Duration::minutes(10)));
        assert!(!credential.is_expired());
    }

    #[test]
    fn new_computes_expiry_from_expires_in() {
        let credential = Credential::new("access".to_string(), None, None, Some(3600));
        let expires_at = credential.expires_at.expect("expiry set");
        let remaining = expires_at - Utc::now();
        assert!(remaining > Duration::minutes(59));
        assert!(remaining <= Duration::minutes(60));
        assert_eq!(credential.token_type, "Bearer");
    }

    #[test]
    fn new_without_expires_in_is_expired() {
        let credential = Credential::new("access".to_string(), None, None, None);
        assert!(credential.is_expired());
    }
}
