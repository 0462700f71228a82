//! Zyra — CLI AI chat client with OAuth device-flow login.
//!
//! The interesting part lives in [`auth`]: an OAuth 2.0 Device
//! Authorization Grant client, a polling scheduler with server-driven
//! backoff, and the single-file credential cache it populates. [`chat`]
//! wraps a streaming model client and a local conversation store, and
//! [`cli`] exposes `login` / `logout` / `whoami` / `chat`.
//!
//! # Quick Start
//!
//! ```no_run
//! use zyra::auth::{DeviceAuthorizationClient, DevicePoller, LoginOutcome};
//!
//! # async fn example() -> Result<(), zyra::auth::AuthError> {
//! let client = DeviceAuthorizationClient::new(
//!     "http://localhost:3005".to_string(),
//!     "my-client-id".to_string(),
//! );
//! let session = client.request_code("openid profile email").await?;
//! println!("Visit {} and enter {}", session.display_uri(), session.user_code);
//! if let LoginOutcome::Authorized(credential) = DevicePoller::new(&client).run(&session).await? {
//!     println!("logged in as {}", credential.access_token);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
