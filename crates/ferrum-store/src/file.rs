//! Read-only identity store loaded from a JSON document.

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use ferrum_auth::password::{PasswordEncoder, generate_salt};
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_entity::client::Client;
use ferrum_entity::federation::UserFederationServiceConfig;
use ferrum_entity::realm::Realm;
use ferrum_entity::server_data::ServerData;
use ferrum_entity::user::UserDocument;

use crate::contract::IdentityStore;

/// Identity store serving a [`ServerData`] document held in memory.
///
/// Realms keep their clients and users embedded. Every write fails with
/// `NotImplemented`.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    data: ServerData,
}

impl FileIdentityStore {
    /// Load the store from a JSON file.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                ferrum_core::ErrorKind::Configuration,
                format!("Failed to read data file '{}'", path.display()),
                e,
            )
        })?;
        let data: ServerData = serde_json::from_str(&raw).map_err(|e| {
            AppError::with_source(
                ferrum_core::ErrorKind::Serialization,
                format!("Failed to parse data file '{}'", path.display()),
                e,
            )
        })?;
        info!(path = %path.display(), realms = data.realms.len(), "Loaded data file");
        Ok(Self::from_data(data))
    }

    /// Build the store from an already parsed document.
    ///
    /// Realms without a salt get a fresh one, and plaintext passwords are
    /// hashed under the realm salt. Values that already have the shape of a
    /// hash are kept.
    pub fn from_data(mut data: ServerData) -> Self {
        for realm in &mut data.realms {
            if realm.password_salt.is_empty() {
                realm.password_salt = generate_salt();
            }
            let encoder = PasswordEncoder::for_realm(realm);
            for user in &mut realm.users {
                let hashed = user
                    .password_hash()
                    .filter(|p| !PasswordEncoder::looks_hashed(p))
                    .map(|p| encoder.hash(p));
                if let Some(hash) = hashed {
                    user.set_password_hash(hash);
                }
            }
        }
        Self { data }
    }

    fn realm(&self, name: &str) -> AppResult<&Realm> {
        // Realm names are case-sensitive.
        self.data
            .realms
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| AppError::not_found(format!("realm '{name}' not found")))
    }

    fn users(&self, realm: &str) -> AppResult<&[UserDocument]> {
        let realm = self.realm(realm)?;
        if realm.users.is_empty() {
            return Err(AppError::zero_length(format!(
                "realm '{}' has no users",
                realm.name
            )));
        }
        Ok(&realm.users)
    }

    fn read_only(operation: &str) -> AppError {
        warn!(operation, "Write attempted on read-only file store");
        AppError::not_implemented(format!("{operation} is not supported by the file data source"))
    }
}

#[async_trait]
impl IdentityStore for FileIdentityStore {
    async fn is_available(&self) -> bool {
        true
    }

    async fn get_realm(&self, realm: &str) -> AppResult<Realm> {
        let mut found = self.realm(realm)?.clone();
        found.users.clear();
        Ok(found)
    }

    async fn create_realm(&self, _realm: Realm) -> AppResult<()> {
        Err(Self::read_only("create_realm"))
    }

    async fn update_realm(&self, _realm: &str, _new_realm: Realm) -> AppResult<()> {
        Err(Self::read_only("update_realm"))
    }

    async fn delete_realm(&self, _realm: &str) -> AppResult<()> {
        Err(Self::read_only("delete_realm"))
    }

    async fn get_clients(&self, realm: &str) -> AppResult<Vec<Client>> {
        Ok(self.realm(realm)?.clients.clone())
    }

    async fn get_client(&self, realm: &str, name: &str) -> AppResult<Client> {
        self.realm(realm)?
            .clients
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("client '{name}' not found in realm '{realm}'")))
    }

    async fn create_client(&self, _realm: &str, _client: Client) -> AppResult<()> {
        Err(Self::read_only("create_client"))
    }

    async fn update_client(&self, _realm: &str, _name: &str, _client: Client) -> AppResult<()> {
        Err(Self::read_only("update_client"))
    }

    async fn delete_client(&self, _realm: &str, _name: &str) -> AppResult<()> {
        Err(Self::read_only("delete_client"))
    }

    async fn get_users(&self, realm: &str) -> AppResult<Vec<UserDocument>> {
        Ok(self.users(realm)?.to_vec())
    }

    async fn get_user(&self, realm: &str, username: &str) -> AppResult<UserDocument> {
        self.users(realm)?
            .iter()
            .find(|u| u.username() == username)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("user '{username}' not found in realm '{realm}'")))
    }

    async fn get_user_by_id(&self, realm: &str, id: Uuid) -> AppResult<UserDocument> {
        self.users(realm)?
            .iter()
            .find(|u| u.id().is_ok_and(|uid| uid == id))
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!("user with id '{id}' not found in realm '{realm}'"))
            })
    }

    async fn create_user(&self, _realm: &str, _user: UserDocument) -> AppResult<()> {
        Err(Self::read_only("create_user"))
    }

    async fn update_user(&self, _realm: &str, _username: &str, _user: UserDocument) -> AppResult<()> {
        Err(Self::read_only("update_user"))
    }

    async fn delete_user(&self, _realm: &str, _username: &str) -> AppResult<()> {
        Err(Self::read_only("delete_user"))
    }

    async fn set_password(&self, _realm: &str, _username: &str, _password: &str) -> AppResult<()> {
        Err(Self::read_only("set_password"))
    }

    async fn get_user_federation_configs(
        &self,
        realm: &str,
    ) -> AppResult<Vec<UserFederationServiceConfig>> {
        Ok(self.realm(realm)?.user_federation_services.clone())
    }

    async fn get_user_federation_config(
        &self,
        realm: &str,
        name: &str,
    ) -> AppResult<UserFederationServiceConfig> {
        self.realm(realm)?
            .user_federation_services
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "user federation config '{name}' not found in realm '{realm}'"
                ))
            })
    }

    async fn create_user_federation_config(
        &self,
        _realm: &str,
        _config: UserFederationServiceConfig,
    ) -> AppResult<()> {
        Err(Self::read_only("create_user_federation_config"))
    }

    async fn update_user_federation_config(
        &self,
        _realm: &str,
        _name: &str,
        _config: UserFederationServiceConfig,
    ) -> AppResult<()> {
        Err(Self::read_only("update_user_federation_config"))
    }

    async fn delete_user_federation_config(&self, _realm: &str, _name: &str) -> AppResult<()> {
        Err(Self::read_only("delete_user_federation_config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_core::ErrorKind;

    const DATA: &str = r#"{
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
                    "sub": "667ff6a7-3f6b-449b-a217-6fc5d9ac0723",
                    "preferred_username": "vano",
                    "email": "vano@wissance.com"
                },
                "credentials": {"password": "1234567890"}
            }]
        }]
    }"#;

    fn make_store() -> FileIdentityStore {
        FileIdentityStore::from_data(serde_json::from_str(DATA).unwrap())
    }

    #[tokio::test]
    async fn test_get_realm_strips_users() {
        let store = make_store();
        let realm = store.get_realm("myapp").await.unwrap();
        assert!(realm.users.is_empty());
        assert_eq!(realm.clients.len(), 1);
        assert_eq!(realm.token_expiration, 330);
        assert_eq!(realm.password_salt.len(), 32);
    }

    #[tokio::test]
    async fn test_realm_names_are_case_sensitive() {
        let store = make_store();
        let err = store.get_realm("MyApp").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_lookups() {
        let store = make_store();
        let client = store
            .get_client("myapp", "test-service-app-client")
            .await
            .unwrap();
        assert!(client.accepts_secret(Some("fb6Z4RsOadVycQoeQiN57xpu8w8wplYz")));

        let by_name = store.get_user("myapp", "vano").await.unwrap();
        let by_id = store
            .get_user_by_id("myapp", by_name.id().unwrap())
            .await
            .unwrap();
        assert_eq!(by_name, by_id);
        assert!(store.get_user("myapp", "nobody").await.is_err());
    }

    #[tokio::test]
    async fn test_plaintext_passwords_hashed_at_load() {
        let store = make_store();
        let realm = store.get_realm("myapp").await.unwrap();
        let user = store.get_user("myapp", "vano").await.unwrap();
        let hash = user.password_hash().unwrap();
        assert_ne!(hash, "1234567890");
        assert!(PasswordEncoder::for_realm(&realm).matches("1234567890", hash));
    }

    #[tokio::test]
    async fn test_existing_hash_kept() {
        let mut data: ServerData = serde_json::from_str(DATA).unwrap();
        data.realms[0].password_salt = "fixed".to_string();
        let hash = PasswordEncoder::new("fixed").hash("1234567890");
        data.realms[0].users[0].set_password_hash(hash.clone());

        let store = FileIdentityStore::from_data(data);
        let user = store.get_user("myapp", "vano").await.unwrap();
        assert_eq!(user.password_hash(), Some(hash.as_str()));
    }

    #[tokio::test]
    async fn test_realm_without_clients_lists_empty() {
        let mut data: ServerData = serde_json::from_str(DATA).unwrap();
        data.realms[0].clients.clear();
        let store = FileIdentityStore::from_data(data);
        assert!(store.get_clients("myapp").await.unwrap().is_empty());
        assert_eq!(
            store.get_client("myapp", "test-service-app-client").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_writes_not_implemented() {
        let store = make_store();
        let err = store
            .create_realm(Realm::new("other", 1, 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotImplemented);
        assert!(store.delete_user("myapp", "vano").await.is_err());
        assert!(store.set_password("myapp", "vano", "x").await.is_err());
    }

    #[tokio::test]
    async fn test_open_from_disk() {
        let path = std::env::temp_dir().join(format!("ferrum-data-{}.json", Uuid::new_v4()));
        tokio::fs::write(&path, DATA).await.unwrap();
        let store = FileIdentityStore::open(&path).await.unwrap();
        assert!(store.is_available().await);
        assert_eq!(store.get_users("myapp").await.unwrap().len(), 1);
        tokio::fs::remove_file(&path).await.unwrap();

        let err = FileIdentityStore::open(&path).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
