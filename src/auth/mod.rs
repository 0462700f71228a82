//! OAuth 2.0 Device Authorization Grant flow and local credential cache.

pub mod client;
pub mod credential;
pub mod device_code;
pub mod error;
pub mod guard;
pub mod poller;
pub mod store;

pub use client::{DeviceAuthorizationClient, PollToken, UserProfile};
pub use credential::Credential;
pub use device_code::{DeviceCodePoll, DeviceCodeSession, SessionStatus};
pub use error::AuthError;
pub use guard::SessionGuard;
pub use poller::{DevicePoller, LoginOutcome};
pub use store::CredentialStore;
