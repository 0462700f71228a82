//! CLI auth command handlers for login, logout, and whoami.

use crate::auth::{
    CredentialStore, DeviceAuthorizationClient, DevicePoller, LoginOutcome, SessionGuard,
};
use crate::config::ZyraConfig;
use crate::error::{Result, ZyraError};

/// Handle `zyra login`.
pub async fn handle_login(config: &ZyraConfig) -> Result<()> {
    let store = CredentialStore::new(config.credentials_path());
    let client =
        DeviceAuthorizationClient::new(config.server_url.clone(), config.client_id.clone());

    if let Some(existing) = store.load() {
        if !existing.is_expired() {
            println!("Already logged in. Run `zyra logout` first to re-authenticate.");
            return Ok(());
        }
    }

    println!("Requesting device authorization...");
    let session = client.request_code(&config.scope).await?;

    println!("\nVisit: {}", session.display_uri());
    println!("Enter code: {}", session.user_code);
    let minutes = (session.expires_at - chrono::Utc::now()).num_minutes();
    println!("Waiting for authorization (expires in {minutes} minutes)...\n");

    // Ctrl-C cancels polling mid-flight; nothing has been written yet.
    let poller = DevicePoller::new(&client);
    let outcome = tokio::select! {
        outcome = poller.run(&session) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            println!("\nLogin cancelled.");
            return Ok(());
        }
    };

    match outcome {
        LoginOutcome::Authorized(credential) => {
            if !store.save(&credential) {
                println!("Warning: could not save credentials; you may need to login again on next use.");
            } else {
                println!("Credentials saved to {}", store.path().display());
            }
            println!("Successfully logged in!");
            Ok(())
        }
        LoginOutcome::Denied => Err(ZyraError::Authentication(
            "authorization was denied by the user".to_string(),
        )),
        LoginOutcome::Expired => Err(ZyraError::Authentication(
            "the device code expired before authorization; please try again".to_string(),
        )),
    }
}

/// Handle `zyra logout`.
pub fn handle_logout(config: &ZyraConfig) -> Result<()> {
    let store = CredentialStore::new(config.credentials_path());
    if store.load().is_none() {
        println!("You're not logged in.");
        return Ok(());
    }
    if store.clear() {
        println!("Successfully logged out.");
        Ok(())
    } else {
        Err(ZyraError::Authentication(
            "could not clear the credential file".to_string(),
        ))
    }
}

/// Handle `zyra whoami`.
pub async fn handle_whoami(config: &ZyraConfig) -> Result<()> {
    let store = CredentialStore::new(config.credentials_path());
    let client =
        DeviceAuthorizationClient::new(config.server_url.clone(), config.client_id.clone());
    let guard = SessionGuard::new(&store, &client);
    let credential = guard.require_authenticated().await?;

    match client.fetch_user(&credential.access_token).await {
        Ok(user) => {
            println!("User: {}", user.name);
            println!("Email: {}", user.email);
            println!("ID: {}", user.id);
        }
        Err(err) => {
            // Server may be unreachable while the local session is still fine.
            tracing::debug!(error = %err, "user lookup failed, showing local session info");
            println!("Logged in (user lookup unavailable: {err})");
            if let Some(expires_at) = credential.expires_at {
                println!("Session expires at {}", expires_at.format("%Y-%m-%d %H:%M"));
            }
        }
    }
    Ok(())
}
