//! Integration tests for the identity stores behind the engine.

use serde_json::{Value, json};

use ferrum_core::ErrorKind;
use ferrum_core::traits::kv::KeyValueStore;
use ferrum_entity::client::Client;
use ferrum_entity::realm::Realm;
use ferrum_service::TokenGenerationData;

use crate::helpers::{self, ALICE_ID, TestApp};

fn batch_names(batches: &[String]) -> Vec<String> {
    batches
        .iter()
        .flat_map(|b| serde_json::from_str::<Vec<Value>>(b).unwrap())
        .map(|entry| entry["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_realm_links_every_member() {
    let app = TestApp::new().await;

    let clients = app.backend.lrange("fe.realm_r1_clients").await.unwrap();
    let users = app.backend.lrange("fe.realm_r1_users").await.unwrap();
    assert_eq!(batch_names(&clients), vec!["c1"]);
    assert_eq!(batch_names(&users), vec!["alice"]);

    assert!(app.backend.get("fe.r1_client_c1").await.unwrap().is_some());
    assert!(app.backend.get("fe.r1_user_alice").await.unwrap().is_some());

    let stored: Value =
        serde_json::from_str(&app.backend.get("fe.realm_r1").await.unwrap().unwrap()).unwrap();
    assert!(stored["clients"].as_array().is_none_or(Vec::is_empty));
    assert!(stored["users"].as_array().is_none_or(Vec::is_empty));
}

#[tokio::test]
async fn test_delete_client_unlinks_it() {
    let app = TestApp::new().await;
    app.store
        .create_client("r1", Client::public("spa"))
        .await
        .unwrap();
    app.store.delete_client("r1", "c1").await.unwrap();

    let clients = app.backend.lrange("fe.realm_r1_clients").await.unwrap();
    assert_eq!(batch_names(&clients), vec!["spa"]);
    assert!(app.backend.get("fe.r1_client_c1").await.unwrap().is_none());

    let err = app.sign_in_result().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidClient);
}

#[tokio::test]
async fn test_duplicates_rejected() {
    let app = TestApp::new().await;

    let err = app
        .store
        .create_realm(Realm::new("r1", 1, 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyExists);

    let err = app
        .store
        .create_client("r1", Client::confidential("c1", "other"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyExists);

    let err = app
        .store
        .create_user("r1", helpers::make_user(ALICE_ID, "alice", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyExists);

    // The originals are untouched.
    app.sign_in().await;
}

#[tokio::test]
async fn test_delete_realm_removes_everything() {
    let app = TestApp::new().await;
    app.store.delete_realm("r1").await.unwrap();

    for key in [
        "fe.realm_r1",
        "fe.r1_client_c1",
        "fe.r1_user_alice",
    ] {
        assert!(app.backend.get(key).await.unwrap().is_none(), "{key} left behind");
    }
    assert!(app.backend.lrange("fe.realm_r1_clients").await.unwrap().is_empty());

    let err = app.sign_in_result().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_file_backend_serves_grants() {
    let data = json!({
        "realms": [{
            "name": "myapp",
            "token_expiration": 330,
            "refresh_expiration": 200,
            "clients": [{
                "id": "d4dc483d-7d0d-4d2e-a0a0-2d34b55e5a14",
                "name": "test-service-app-client",
                "type": "confidential",
                "auth": {"type": 1, "value": "fb6Z4RsOadVycQoeQiN57xpu8w8wplYz"}
            }],
            "users": [{
                "info": {
                    "sub": ALICE_ID,
                    "preferred_username": "vano",
                    "email": "vano@example.com"
                },
                "credentials": {"password": "1234567890"}
            }]
        }]
    });
    let path = helpers::write_data_file(&data).await;
    let engine = helpers::file_engine(&path).await;
    tokio::fs::remove_file(&path).await.unwrap();

    let grant = TokenGenerationData::password(
        "test-service-app-client",
        Some("fb6Z4RsOadVycQoeQiN57xpu8w8wplYz"),
        "vano",
        "1234567890",
        "profile",
    );
    let token = engine.get_token("myapp", &grant).await.unwrap();
    assert_eq!(token.expires_in, 330);
    assert!(engine.introspect("myapp", &token.access_token).await.unwrap().active);

    let info = engine.userinfo("myapp", &token.access_token).await.unwrap();
    assert_eq!(info["email"], "vano@example.com");

    let err = engine
        .store()
        .create_client("myapp", Client::public("spa"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotImplemented);
}

impl TestApp {
    async fn sign_in_result(&self) -> ferrum_core::AppResult<ferrum_service::TokenResponse> {
        self.engine
            .get_token("r1", &helpers::password_grant("S", "P"))
            .await
    }
}
