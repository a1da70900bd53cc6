//! Shared test helpers for integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use uuid::Uuid;

use ferrum_core::config::{DataSourceConfig, DataSourceType, ServerConfig};
use ferrum_entity::client::Client;
use ferrum_entity::realm::Realm;
use ferrum_entity::user::UserDocument;
use ferrum_service::{AuthorizationEngine, TokenGenerationData, TokenResponse};
use ferrum_store::memory::MemoryKeyValueStore;
use ferrum_store::{IdentityStore, KvIdentityStore, StoreManager};

pub const SIGNING_KEY: &[u8] = b"integration-signing-key";
pub const ALICE_ID: &str = "667ff6a7-3f6b-449b-a217-6fc5d9ac0723";

/// Test application context
pub struct TestApp {
    /// The engine under test
    pub engine: AuthorizationEngine,
    /// The store the engine reads, for direct manipulation
    pub store: Arc<dyn IdentityStore>,
    /// Raw key-value backend behind the store
    pub backend: Arc<MemoryKeyValueStore>,
}

impl TestApp {
    /// Memory-backed app with realm `r1` (300 s access, 600 s refresh).
    pub async fn new() -> Self {
        Self::with_lifetimes(300, 600).await
    }

    /// Memory-backed app with realm `r1` and the given token lifetimes.
    pub async fn with_lifetimes(access_secs: u64, refresh_secs: u64) -> Self {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store: Arc<dyn IdentityStore> =
            Arc::new(KvIdentityStore::new(backend.clone(), "fe"));
        store
            .create_realm(make_realm(access_secs, refresh_secs))
            .await
            .expect("Failed to seed realm");

        let engine = AuthorizationEngine::new(store.clone(), ServerConfig::default(), SIGNING_KEY);
        Self {
            engine,
            store,
            backend,
        }
    }

    /// Password grant for `alice` through confidential client `c1`.
    pub async fn sign_in(&self) -> TokenResponse {
        self.engine
            .get_token("r1", &password_grant("S", "P"))
            .await
            .expect("Sign in failed")
    }
}

/// Realm `r1` with confidential client `c1` (secret `S`) and user `alice`
/// (password `P`).
pub fn make_realm(access_secs: u64, refresh_secs: u64) -> Realm {
    Realm {
        clients: vec![Client::confidential("c1", "S")],
        users: vec![make_user(ALICE_ID, "alice", "P")],
        ..Realm::new("r1", access_secs, refresh_secs)
    }
}

pub fn make_user(id: &str, name: &str, password: &str) -> UserDocument {
    UserDocument::new(json!({
        "info": {
            "sub": id,
            "preferred_username": name,
            "email": format!("{name}@example.com"),
            "email_verified": true
        },
        "credentials": {"password": password}
    }))
    .expect("Invalid user document")
}

pub fn password_grant(secret: &str, password: &str) -> TokenGenerationData {
    TokenGenerationData::password("c1", Some(secret), "alice", password, "profile email")
}

/// Writes `data` to a unique file under the temp dir.
pub async fn write_data_file(data: &Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ferrum-it-{}.json", Uuid::new_v4()));
    tokio::fs::write(&path, serde_json::to_vec_pretty(data).unwrap())
        .await
        .expect("Failed to write data file");
    path
}

/// Engine over the read-only file store loaded from `path`.
pub async fn file_engine(path: &Path) -> AuthorizationEngine {
    let config = DataSourceConfig {
        kind: DataSourceType::File,
        source: Some(path.to_string_lossy().into_owned()),
        ..DataSourceConfig::default()
    };
    let store = StoreManager::new(&config)
        .await
        .expect("Failed to open file store")
        .store();
    AuthorizationEngine::new(store, ServerConfig::default(), SIGNING_KEY)
}
