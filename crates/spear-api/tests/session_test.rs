#![allow(clippy::unwrap_used)]
// Integration tests for `SessionManager` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use url::Url;
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spear_api::{ApiConfig, Dispatcher, Error, RateLimitPolicy, SessionManager};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SessionManager) {
    let server = MockServer::start().await;
    let mut config = ApiConfig::new(Url::parse(&format!("{}/api/v2", server.uri())).unwrap());
    config.rate_limit = RateLimitPolicy::disabled();
    let session = SessionManager::new(Dispatcher::new(&config).unwrap());
    (server, session)
}

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/token"))
        .and(body_json(json!({ "username": "admin", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(server)
        .await;
}

// ── authenticate ────────────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_installs_token() {
    let (server, session) = setup().await;
    mount_login(&server, "tok-login").await;

    let token = session.authenticate("admin", &password("s3cret")).await.unwrap();

    assert_eq!(token.token.expose_secret(), "tok-login");
    assert!(session.is_authorised());
    assert!(session.dispatcher().has_token());
}

#[tokio::test]
async fn test_authenticate_rejected_credentials() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let result = session.authenticate("admin", &password("wrong")).await;

    assert!(
        matches!(result, Err(Error::AuthenticationFailed { .. })),
        "expected AuthenticationFailed, got: {result:?}"
    );
    assert!(!session.is_authorised());
    assert!(!session.dispatcher().has_token());
}

#[tokio::test]
async fn test_authenticate_malformed_body() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jwt": "nope" })))
        .mount(&server)
        .await;

    let result = session.authenticate("admin", &password("s3cret")).await;
    assert!(matches!(result, Err(Error::AuthenticationFailed { .. })));
}

#[tokio::test]
async fn test_authenticate_unreachable_server() {
    let server = MockServer::start().await;
    let base = Url::parse(&format!("{}/api/v2", server.uri())).unwrap();
    drop(server);

    let mut config = ApiConfig::new(base);
    config.rate_limit = RateLimitPolicy::disabled();
    let session = SessionManager::new(Dispatcher::new(&config).unwrap());

    let result = session.authenticate("admin", &password("s3cret")).await;
    assert!(matches!(result, Err(Error::AuthenticationFailed { .. })));
}

// ── refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_uses_current_token_and_installs_new_one() {
    let (server, session) = setup().await;
    mount_login(&server, "tok-old").await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/auth/token"))
        .and(bearer_token("tok-old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-new" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/auth/session"))
        .and(bearer_token("tok-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "userId": "admin" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(session.authenticate("admin", &password("s3cret")).await);
    let refreshed = session.refresh().await.unwrap();
    assert_eq!(refreshed.token.expose_secret(), "tok-new");

    let info = session.current_session().await.unwrap();
    assert_eq!(info.user_id.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_token() {
    let (server, session) = setup().await;
    mount_login(&server, "tok-old").await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/auth/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/auth/session"))
        .and(bearer_token("tok-old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "userId": "admin" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(session.authenticate("admin", &password("s3cret")).await);

    let result = session.refresh().await;
    assert!(
        matches!(result, Err(Error::SessionRefreshFailed { .. })),
        "expected SessionRefreshFailed, got: {result:?}"
    );

    // The old token is still the one sent.
    assert_ok!(session.current_session().await);
}

// ── current_session ─────────────────────────────────────────────────

#[tokio::test]
async fn test_current_session_before_login() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let result = session.current_session().await;
    assert!(matches!(result, Err(Error::SessionNotFound)));
}

#[tokio::test]
async fn test_current_session_expired() {
    let (server, session) = setup().await;
    mount_login(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/api/v2/auth/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert_ok!(session.authenticate("admin", &password("s3cret")).await);
    let err = assert_err!(session.current_session().await);
    assert!(matches!(err, Error::SessionNotFound));
}
