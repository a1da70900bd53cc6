//! The identity store contract shared by every backend.

use async_trait::async_trait;
use uuid::Uuid;

use ferrum_core::result::AppResult;
use ferrum_entity::client::Client;
use ferrum_entity::federation::UserFederationServiceConfig;
use ferrum_entity::realm::Realm;
use ferrum_entity::user::UserDocument;

/// Persistence of realms, clients, users, and federation configs.
///
/// Names are case-sensitive and unique within their realm. Multi-step
/// writes are not transactional: a failure part way leaves the steps that
/// already ran in place.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the backend can serve requests right now.
    async fn is_available(&self) -> bool;

    // ── Realms ─────────────────────────────────────────────────

    /// Realm metadata. Clients and users are fetched separately.
    async fn get_realm(&self, realm: &str) -> AppResult<Realm>;

    /// Persist a realm together with its embedded clients and users.
    ///
    /// A fresh password salt is generated and every user password is
    /// hashed under it.
    async fn create_realm(&self, realm: Realm) -> AppResult<()>;

    /// Replace realm metadata. A changed name moves every client and user
    /// to the new realm.
    async fn update_realm(&self, realm: &str, new_realm: Realm) -> AppResult<()>;

    /// Remove a realm with all of its clients and users.
    async fn delete_realm(&self, realm: &str) -> AppResult<()>;

    // ── Clients ────────────────────────────────────────────────

    /// All clients of a realm.
    ///
    /// A realm without clients is `ZeroLength` on the key-value store and
    /// an empty list on the file store, whose realms embed their clients.
    async fn get_clients(&self, realm: &str) -> AppResult<Vec<Client>>;

    /// A client by name.
    async fn get_client(&self, realm: &str, name: &str) -> AppResult<Client>;

    /// Register a new client.
    async fn create_client(&self, realm: &str, client: Client) -> AppResult<()>;

    /// Replace a client. A changed id or name relinks the client.
    async fn update_client(&self, realm: &str, name: &str, client: Client) -> AppResult<()>;

    /// Remove a client.
    async fn delete_client(&self, realm: &str, name: &str) -> AppResult<()>;

    // ── Users ──────────────────────────────────────────────────

    /// All users of a realm.
    async fn get_users(&self, realm: &str) -> AppResult<Vec<UserDocument>>;

    /// A user by `preferred_username`.
    async fn get_user(&self, realm: &str, username: &str) -> AppResult<UserDocument>;

    /// A user by id (`info.sub`).
    async fn get_user_by_id(&self, realm: &str, id: Uuid) -> AppResult<UserDocument>;

    /// Register a new user, hashing its password under the realm salt.
    async fn create_user(&self, realm: &str, user: UserDocument) -> AppResult<()>;

    /// Replace a user document as given. A changed id or name relinks the user.
    async fn update_user(&self, realm: &str, username: &str, user: UserDocument) -> AppResult<()>;

    /// Remove a user.
    async fn delete_user(&self, realm: &str, username: &str) -> AppResult<()>;

    /// Hash `password` under the realm salt and store it on the user.
    async fn set_password(&self, realm: &str, username: &str, password: &str) -> AppResult<()>;

    // ── User federation ────────────────────────────────────────

    /// All federation configs of a realm.
    async fn get_user_federation_configs(
        &self,
        realm: &str,
    ) -> AppResult<Vec<UserFederationServiceConfig>>;

    /// A federation config by name.
    async fn get_user_federation_config(
        &self,
        realm: &str,
        name: &str,
    ) -> AppResult<UserFederationServiceConfig>;

    /// Register a new federation config.
    async fn create_user_federation_config(
        &self,
        realm: &str,
        config: UserFederationServiceConfig,
    ) -> AppResult<()>;

    /// Replace a federation config.
    async fn update_user_federation_config(
        &self,
        realm: &str,
        name: &str,
        config: UserFederationServiceConfig,
    ) -> AppResult<()>;

    /// Remove a federation config.
    async fn delete_user_federation_config(&self, realm: &str, name: &str) -> AppResult<()>;
}
