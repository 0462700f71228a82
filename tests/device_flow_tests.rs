use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zyra::auth::{AuthError, DeviceAuthorizationClient, DeviceCodePoll, DeviceCodeSession, PollToken};

fn device_client(server: &MockServer) -> DeviceAuthorizationClient {
    DeviceAuthorizationClient::new(server.uri(), "client-123".to_string())
}

fn active_session(interval_secs: u64) -> DeviceCodeSession {
    DeviceCodeSession {
        device_code: "device-code-1".to_string(),
        user_code: "ABCD-EFGH".to_string(),
        verification_uri: "http://localhost:3005/device".to_string(),
        verification_uri_complete: None,
        interval_secs,
        expires_at: Utc::now() + Duration::minutes(10),
    }
}

#[tokio::test]
async fn request_code_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/code"))
        .and(body_partial_json(json!({
            "client_id": "client-123",
            "scope": "openid profile email"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "device-123",
            "user_code": "ABCD-EFGH",
            "verification_uri": "http://localhost:3005/device",
            "verification_uri_complete": "http://localhost:3005/device?user_code=ABCD-EFGH",
            "interval": 5,
            "expires_in": 600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = device_client(&server);
    let session = client
        .request_code("openid profile email")
        .await
        .expect("request code");

    assert_eq!(session.device_code, "device-123");
    assert_eq!(session.user_code, "ABCD-EFGH");
    assert_eq!(session.interval_secs, 5);
    assert_eq!(
        session.display_uri(),
        "http://localhost:3005/device?user_code=ABCD-EFGH"
    );
    assert!(session.expires_at > Utc::now());
}

#[tokio::test]
async fn request_code_defaults_interval_to_five() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "device-123",
            "user_code": "ABCD-EFGH",
            "verification_uri": "http://localhost:3005/device",
            "expires_in": 600
        })))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let session = client.request_code("openid").await.expect("request code");
    assert_eq!(session.interval_secs, 5);
    assert_eq!(session.display_uri(), "http://localhost:3005/device");
}

#[tokio::test]
async fn request_code_server_error_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/code"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let result = client.request_code("openid").await;
    assert!(matches!(result, Err(AuthError::AuthorizationRequest(_))));
}

#[tokio::test]
async fn request_code_empty_body_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let result = client.request_code("openid").await;
    assert!(matches!(result, Err(AuthError::AuthorizationRequest(_))));
}

#[tokio::test]
async fn poll_token_authorized_builds_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .and(body_partial_json(json!({
            "grant_type": "urn:ietf:params:oauth:grant-type:device_code",
            "device_code": "device-code-1",
            "client_id": "client-123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "token_type": "Bearer",
            "scope": "openid profile email",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = device_client(&server);
    let poll = client
        .poll_token(&active_session(5))
        .await
        .expect("poll token");

    match poll {
        DeviceCodePoll::Authorized { credential } => {
            assert_eq!(credential.access_token, "access-1");
            assert_eq!(credential.refresh_token.as_deref(), Some("refresh-1"));
            assert_eq!(credential.token_type, "Bearer");
            assert_eq!(credential.scope.as_deref(), Some("openid profile email"));
            assert!(!credential.is_expired());
        }
        other => panic!("expected Authorized, got {other:?}"),
    }
}

#[tokio::test]
async fn poll_token_pending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "authorization_pending"
        })))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let poll = client.poll_token(&active_session(5)).await.expect("poll");
    assert!(matches!(poll, DeviceCodePoll::Pending));
}

#[tokio::test]
async fn poll_token_slow_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "slow_down"
        })))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let poll = client.poll_token(&active_session(5)).await.expect("poll");
    assert!(matches!(poll, DeviceCodePoll::SlowDown));
}

#[tokio::test]
async fn poll_token_access_denied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "access_denied"
        })))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let poll = client.poll_token(&active_session(5)).await.expect("poll");
    assert!(matches!(poll, DeviceCodePoll::Denied));
}

#[tokio::test]
async fn poll_token_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "expired_token"
        })))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let poll = client.poll_token(&active_session(5)).await.expect("poll");
    assert!(matches!(poll, DeviceCodePoll::Expired));
}

#[tokio::test]
async fn poll_token_unknown_error_code_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "server_error",
            "error_description": "the backend fell over"
        })))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let result = client.poll_token(&active_session(5)).await;
    match result {
        Err(AuthError::InvalidResponse(msg)) => assert!(msg.contains("the backend fell over")),
        other => panic!("expected InvalidResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn poll_token_missing_token_and_error_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let result = client.poll_token(&active_session(5)).await;
    assert!(matches!(result, Err(AuthError::InvalidResponse(_))));
}

#[tokio::test]
async fn fetch_user_returns_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(wiremock::matchers::header(
            "authorization",
            "Bearer access-1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "name": "Ada",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = device_client(&server);
    let user = client.fetch_user("access-1").await.expect("fetch user");
    assert_eq!(user.id, "user-1");
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn fetch_user_unauthorized_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = device_client(&server);
    let result = client.fetch_user("stale").await;
    assert!(matches!(result, Err(AuthError::InvalidResponse(_))));
}
