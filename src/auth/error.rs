use thiserror::Error;

use crate::error::ZyraError;

/// Normalized authentication errors across the device flow and the
/// commands gated behind it.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authenticated. Run `zyra login` first")]
    NotAuthenticated,
    #[error("Session expired. Run `zyra login` again")]
    SessionExpired,
    #[error("Device authorization request failed: {0}")]
    AuthorizationRequest(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for ZyraError {
    fn from(error: AuthError) -> Self {
        ZyraError::Authentication(error.to_string())
    }
}
