//! Integration tests for the grant, refresh and introspection flows.

use std::time::Duration;

use ferrum_auth::jwt::JwtDecoder;
use ferrum_core::ErrorKind;
use ferrum_service::{ErrorDetails, TokenGenerationData};
use uuid::Uuid;

use crate::helpers::{self, ALICE_ID, SIGNING_KEY, TestApp};

#[tokio::test]
async fn test_password_grant_success() {
    let app = TestApp::new().await;
    let token = app.sign_in().await;

    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.not_before_policy, 0);
    assert_eq!(token.expires_in, 300);

    let claims = JwtDecoder::new(SIGNING_KEY)
        .decode(&token.access_token)
        .unwrap();
    assert_eq!(claims["iss"], "http://localhost:8182/auth/realms/r1");
    assert_eq!(claims["aud"], "account");
    assert_eq!(claims["sub"], ALICE_ID);
    assert_eq!(claims["sid"], token.session_state.to_string());
    assert_eq!(claims["preferred_username"], "alice");
    assert_eq!(claims["email_verified"], true);
    assert!(!claims.contains_key("credentials"));

    let refresh_claims = JwtDecoder::new(SIGNING_KEY)
        .decode(&token.refresh_token)
        .unwrap();
    assert_eq!(refresh_claims["aud"], claims["iss"]);
    assert_eq!(refresh_claims["typ"], "Refresh");
}

#[tokio::test]
async fn test_wrong_client_secret() {
    let app = TestApp::new().await;
    let err = app
        .engine
        .get_token("r1", &helpers::password_grant("wrong", "P"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidClient);
    let details = ErrorDetails::from_error(&err);
    assert_eq!(details.message, "Invalid client");
    assert_eq!(details.description, "Invalid client credentials");
}

#[tokio::test]
async fn test_wrong_password() {
    let app = TestApp::new().await;
    let err = app
        .engine
        .get_token("r1", &helpers::password_grant("S", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidUserCredentials);
    let details = ErrorDetails::from_error(&err);
    assert_eq!(details.message, "invalid grant");
    assert_eq!(details.description, "Invalid user credentials");
}

#[tokio::test]
async fn test_token_lifecycle() {
    let app = TestApp::with_lifetimes(1, 3).await;
    let token = app.sign_in().await;
    let user_id = Uuid::parse_str(ALICE_ID).unwrap();

    assert!(app.engine.introspect("r1", &token.access_token).await.unwrap().active);
    assert_eq!(
        app.engine
            .sessions()
            .check_session_and_refresh_expired("r1", user_id),
        (false, false)
    );

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!app.engine.introspect("r1", &token.access_token).await.unwrap().active);
    assert_eq!(
        app.engine
            .sessions()
            .check_session_and_refresh_expired("r1", user_id),
        (true, false)
    );
}

#[tokio::test]
async fn test_refresh_after_access_expiry() {
    let app = TestApp::with_lifetimes(1, 3).await;
    let token = app.sign_in().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let grant = TokenGenerationData::refresh("c1", Some("S"), token.refresh_token.clone());
    let refreshed = app.engine.get_token("r1", &grant).await.unwrap();

    assert_eq!(refreshed.session_state, token.session_state);
    assert_ne!(refreshed.access_token, token.access_token);
    assert!(app.engine.introspect("r1", &refreshed.access_token).await.unwrap().active);
    assert!(!app.engine.introspect("r1", &token.access_token).await.unwrap().active);

    let info = app.engine.userinfo("r1", &refreshed.access_token).await.unwrap();
    assert_eq!(info["preferred_username"], "alice");
}

#[tokio::test]
async fn test_expired_refresh() {
    let app = TestApp::with_lifetimes(1, 3).await;
    let token = app.sign_in().await;
    tokio::time::sleep(Duration::from_millis(3500)).await;

    let grant = TokenGenerationData::refresh("c1", Some("S"), token.refresh_token);
    let err = app.engine.get_token("r1", &grant).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(err.oauth_error(), "invalid_token");
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let app = TestApp::new().await;
    app.store.set_password("r1", "alice", "rotated").await.unwrap();

    let err = app
        .engine
        .get_token("r1", &helpers::password_grant("S", "P"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidUserCredentials);
    assert!(
        app.engine
            .get_token("r1", &helpers::password_grant("S", "rotated"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_backend_outage_is_not_a_credential_error() {
    let app = TestApp::new().await;
    app.backend.set_available(false);

    let err = app
        .engine
        .get_token("r1", &helpers::password_grant("S", "P"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ProviderUnavailable);

    app.backend.set_available(true);
    app.sign_in().await;
}
