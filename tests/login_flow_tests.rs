//! End-to-end login flow: real HTTP client against a scripted mock server,
//! driven by the polling scheduler, persisting into a real store.

use chrono::{Duration, Utc};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zyra::auth::{
    CredentialStore, DeviceAuthorizationClient, DeviceCodeSession, DevicePoller, LoginOutcome,
};

/// Session with a zero interval so the end-to-end loop runs fast.
fn immediate_session() -> DeviceCodeSession {
    DeviceCodeSession {
        device_code: "device-code-1".to_string(),
        user_code: "ABCD-EFGH".to_string(),
        verification_uri: "http://localhost:3005/device".to_string(),
        verification_uri_complete: None,
        interval_secs: 0,
        expires_at: Utc::now() + Duration::minutes(10),
    }
}

#[tokio::test]
async fn pending_then_authorized_persists_credential() {
    let server = MockServer::start().await;
    // First three polls are pending, then the token arrives.
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "authorization_pending"
        })))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let client = DeviceAuthorizationClient::new(server.uri(), "client-123".to_string());

    let outcome = DevicePoller::new(&client)
        .run(&immediate_session())
        .await
        .expect("login flow");

    match outcome {
        LoginOutcome::Authorized(credential) => {
            assert!(store.save(&credential));
        }
        other => panic!("expected Authorized, got {other:?}"),
    }

    let persisted = store.load().expect("credential persisted");
    assert_eq!(persisted.access_token, "access-1");
    assert_eq!(persisted.refresh_token.as_deref(), Some("refresh-1"));
    assert!(!persisted.is_expired());
}

#[tokio::test]
async fn denied_on_first_poll_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "access_denied"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let client = DeviceAuthorizationClient::new(server.uri(), "client-123".to_string());

    let outcome = DevicePoller::new(&client)
        .run(&immediate_session())
        .await
        .expect("login flow");
    assert!(matches!(outcome, LoginOutcome::Denied));
    assert!(store.load().is_none());
}

#[tokio::test]
async fn transport_failure_aborts_and_writes_nothing() {
    // Point the client at a server that is already gone.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let dir = TempDir::new().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let client = DeviceAuthorizationClient::new(uri, "client-123".to_string());

    let result = DevicePoller::new(&client).run(&immediate_session()).await;
    assert!(result.is_err());
    assert!(store.load().is_none());
}
