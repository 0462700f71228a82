//! Configuration (defaults < .env < environment).

use std::path::PathBuf;

/// Default auth server for local development; override with
/// `ZYRA_SERVER_URL` or `--server-url`.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3005";
pub const DEFAULT_SCOPE: &str = "openid profile email";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Runtime configuration for the CLI.
///
/// Global constants from the original tool (server URL, client id, file
/// paths) are carried here and passed into constructors explicitly.
#[derive(Debug, Clone)]
pub struct ZyraConfig {
    pub server_url: String,
    pub client_id: String,
    pub scope: String,
    pub model: String,
    pub google_api_key: Option<String>,
    pub config_dir: PathBuf,
}

impl ZyraConfig {
    /// Load from environment variables (reading `.env` if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self {
            server_url: std::env::var("ZYRA_SERVER_URL")
                .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
            client_id: std::env::var("ZYRA_CLIENT_ID")
                .or_else(|_| std::env::var("GITHUB_CLIENT_ID"))
                .unwrap_or_default(),
            scope: std::env::var("ZYRA_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string()),
            model: std::env::var("ZYRA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            google_api_key: std::env::var("GOOGLE_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .ok(),
            config_dir: default_config_dir(),
        }
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Location of the single credential file.
    pub fn credentials_path(&self) -> PathBuf {
        self.config_dir.join("credentials.json")
    }

    /// Directory holding persisted conversations.
    pub fn conversations_dir(&self) -> PathBuf {
        self.config_dir.join("conversations")
    }
}

fn default_config_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".zyra"))
        .unwrap_or_else(|| PathBuf::from(".zyra"))
}
