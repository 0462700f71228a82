//! Error types for Zyra.

use thiserror::Error;

/// Primary error type for all Zyra operations.
#[derive(Error, Debug)]
pub enum ZyraError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Chat error: {0}")]
    Chat(String),
}

/// Result type alias using ZyraError.
pub type Result<T> = std::result::Result<T, ZyraError>;
