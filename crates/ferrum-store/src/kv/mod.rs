//! Read-write identity store over a [`KeyValueStore`].
//!
//! Storage rules:
//!
//! 1. A realm is stored on its own under `{ns}.realm_{realm}`, without
//!    embedded clients and users.
//! 2. Every client and user is stored on its own, keyed by realm and name:
//!    `{ns}.{realm}_client_{name}` and `{ns}.{realm}_user_{name}`.
//! 3. Realm membership lives in association lists
//!    (`{ns}.realm_{realm}_clients`, `{ns}.realm_{realm}_users`) whose items
//!    are JSON arrays of `{id, name}` records. See [`association`].
//!
//! Saving a client or user always updates its association list too.

pub mod association;
mod client;
mod federation;
mod realm;
mod user;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_core::traits::kv::KeyValueStore;
use ferrum_entity::client::Client;
use ferrum_entity::federation::UserFederationServiceConfig;
use ferrum_entity::realm::Realm;
use ferrum_entity::user::UserDocument;

use crate::contract::IdentityStore;
use crate::keys::KeyBuilder;

/// Object kinds, as named in errors and logs.
pub(crate) const REALM: &str = "realm";
pub(crate) const REALM_CLIENTS: &str = "realm clients";
pub(crate) const REALM_USERS: &str = "realm users";
pub(crate) const REALM_USER_FEDERATIONS: &str = "realm user federation configs";
pub(crate) const CLIENT: &str = "client";
pub(crate) const USER: &str = "user";

/// Identity store persisting into a Redis-like key-value backend.
#[derive(Debug, Clone)]
pub struct KvIdentityStore {
    /// Key-value backend.
    kv: Arc<dyn KeyValueStore>,
    /// Key layout.
    keys: KeyBuilder,
}

impl KvIdentityStore {
    /// Create a store over `kv` using `namespace` as key prefix.
    pub fn new(kv: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            kv,
            keys: KeyBuilder::new(namespace),
        }
    }

    /// Key layout of this store.
    pub fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    /// The underlying key-value backend.
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    async fn ensure_available(&self) -> AppResult<()> {
        if self.is_available().await {
            return Ok(());
        }
        let (provider, address) = self.kv.describe();
        Err(AppError::provider_unavailable(provider, &address))
    }

    /// Run a contract operation: availability check first, then `fut`, with
    /// `operation` attached to any error.
    async fn guarded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<T>> + Send,
    ) -> AppResult<T> {
        self.ensure_available()
            .await
            .map_err(|e| e.context(operation))?;
        fut.await.map_err(|e| e.context(operation))
    }

    pub(crate) async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.kv.get(key).await?.is_some())
    }

    /// Read one JSON string object. Absent keys are `NotFound`.
    pub(crate) async fn get_object<T: DeserializeOwned>(
        &self,
        kind: &str,
        key: &str,
    ) -> AppResult<T> {
        let raw = self.kv.get(key).await?.ok_or_else(|| {
            debug!(kind, key, "Object not found");
            AppError::not_found(format!("{kind} '{key}' not found"))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Read several JSON string objects at once.
    ///
    /// Fewer objects than keys is `NotAll`.
    pub(crate) async fn get_objects<T: DeserializeOwned>(
        &self,
        kind: &str,
        keys: &[String],
    ) -> AppResult<Vec<T>> {
        let present: Vec<String> = self.kv.mget(keys).await?.into_iter().flatten().collect();
        if present.len() < keys.len() {
            warn!(
                kind,
                expected = keys.len(),
                found = present.len(),
                "Association list names objects the store does not have"
            );
            return Err(AppError::not_all(format!(
                "{} of {} {kind} objects are missing",
                keys.len() - present.len(),
                keys.len()
            )));
        }
        present
            .iter()
            .map(|raw| serde_json::from_str(raw).map_err(AppError::from))
            .collect()
    }

    /// Write one JSON string object, overwriting any previous value.
    pub(crate) async fn put_object<T: Serialize + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw).await
    }

    /// Delete one key. Deleting nothing is `NotFound`.
    pub(crate) async fn delete_object(&self, kind: &str, key: &str) -> AppResult<()> {
        if self.kv.delete(key).await? == 0 {
            warn!(kind, key, "Delete removed no keys");
            return Err(AppError::not_found(format!("{kind} '{key}' not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for KvIdentityStore {
    async fn is_available(&self) -> bool {
        match self.kv.ping().await {
            Ok(alive) => alive,
            Err(e) => {
                debug!(error = %e, "Key-value backend ping failed");
                false
            }
        }
    }

    async fn get_realm(&self, realm: &str) -> AppResult<Realm> {
        self.guarded("get_realm", self.get_realm_object(realm)).await
    }

    async fn create_realm(&self, realm: Realm) -> AppResult<()> {
        self.guarded("create_realm", self.store_realm(realm, true))
            .await
    }

    async fn update_realm(&self, realm: &str, new_realm: Realm) -> AppResult<()> {
        self.guarded("update_realm", self.replace_realm(realm, new_realm))
            .await
    }

    async fn delete_realm(&self, realm: &str) -> AppResult<()> {
        self.guarded("delete_realm", self.remove_realm(realm)).await
    }

    async fn get_clients(&self, realm: &str) -> AppResult<Vec<Client>> {
        self.guarded("get_clients", self.load_clients(realm)).await
    }

    async fn get_client(&self, realm: &str, name: &str) -> AppResult<Client> {
        self.guarded("get_client", self.load_client(realm, name))
            .await
    }

    async fn create_client(&self, realm: &str, client: Client) -> AppResult<()> {
        self.guarded("create_client", self.insert_client(realm, client))
            .await
    }

    async fn update_client(&self, realm: &str, name: &str, client: Client) -> AppResult<()> {
        self.guarded("update_client", self.replace_client(realm, name, client))
            .await
    }

    async fn delete_client(&self, realm: &str, name: &str) -> AppResult<()> {
        self.guarded("delete_client", self.remove_client(realm, name))
            .await
    }

    async fn get_users(&self, realm: &str) -> AppResult<Vec<UserDocument>> {
        self.guarded("get_users", self.load_users(realm)).await
    }

    async fn get_user(&self, realm: &str, username: &str) -> AppResult<UserDocument> {
        self.guarded("get_user", self.load_user(realm, username))
            .await
    }

    async fn get_user_by_id(&self, realm: &str, id: Uuid) -> AppResult<UserDocument> {
        self.guarded("get_user_by_id", self.load_user_by_id(realm, id))
            .await
    }

    async fn create_user(&self, realm: &str, user: UserDocument) -> AppResult<()> {
        self.guarded("create_user", self.insert_user(realm, user))
            .await
    }

    async fn update_user(&self, realm: &str, username: &str, user: UserDocument) -> AppResult<()> {
        self.guarded("update_user", self.replace_user(realm, username, user))
            .await
    }

    async fn delete_user(&self, realm: &str, username: &str) -> AppResult<()> {
        self.guarded("delete_user", self.remove_user(realm, username))
            .await
    }

    async fn set_password(&self, realm: &str, username: &str, password: &str) -> AppResult<()> {
        self.guarded(
            "set_password",
            self.store_password(realm, username, password),
        )
        .await
    }

    async fn get_user_federation_configs(
        &self,
        realm: &str,
    ) -> AppResult<Vec<UserFederationServiceConfig>> {
        self.guarded(
            "get_user_federation_configs",
            self.load_federation_configs(realm),
        )
        .await
    }

    async fn get_user_federation_config(
        &self,
        realm: &str,
        name: &str,
    ) -> AppResult<UserFederationServiceConfig> {
        self.guarded(
            "get_user_federation_config",
            self.load_federation_config(realm, name),
        )
        .await
    }

    async fn create_user_federation_config(
        &self,
        realm: &str,
        config: UserFederationServiceConfig,
    ) -> AppResult<()> {
        self.guarded(
            "create_user_federation_config",
            self.insert_federation_config(realm, config),
        )
        .await
    }

    async fn update_user_federation_config(
        &self,
        realm: &str,
        name: &str,
        config: UserFederationServiceConfig,
    ) -> AppResult<()> {
        self.guarded(
            "update_user_federation_config",
            self.replace_federation_config(realm, name, config),
        )
        .await
    }

    async fn delete_user_federation_config(&self, realm: &str, name: &str) -> AppResult<()> {
        self.guarded(
            "delete_user_federation_config",
            self.remove_federation_config(realm, name),
        )
        .await
    }
}
