//! User federation config operations of the key-value store.
//!
//! A realm has few federation configs, so they are kept whole inside the
//! realm's federation list instead of under keys of their own.

use tracing::info;

use ferrum_core::ErrorKind;
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_entity::federation::UserFederationServiceConfig;

use super::{KvIdentityStore, REALM_USER_FEDERATIONS};

impl KvIdentityStore {
    /// All configs of a realm. A realm without configs has an empty list.
    pub(super) async fn load_federation_configs(
        &self,
        realm: &str,
    ) -> AppResult<Vec<UserFederationServiceConfig>> {
        match self
            .read_list(REALM_USER_FEDERATIONS, &self.keys.realm_user_federations(realm))
            .await
        {
            Ok(configs) => Ok(configs),
            Err(e) if e.is(ErrorKind::ZeroLength) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub(super) async fn load_federation_config(
        &self,
        realm: &str,
        name: &str,
    ) -> AppResult<UserFederationServiceConfig> {
        self.load_federation_configs(realm)
            .await?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| not_found(realm, name))
    }

    pub(super) async fn insert_federation_config(
        &self,
        realm: &str,
        config: UserFederationServiceConfig,
    ) -> AppResult<()> {
        self.get_realm_object(realm).await?;

        let configs = self.load_federation_configs(realm).await?;
        if configs.iter().any(|c| c.name == config.name) {
            return Err(AppError::already_exists(format!(
                "user federation config '{}' already exists in realm '{realm}'",
                config.name
            )));
        }

        self.append_entry(&self.keys.realm_user_federations(realm), &config)
            .await?;
        info!(realm = %realm, federation = %config.name, "User federation config created");
        Ok(())
    }

    pub(super) async fn replace_federation_config(
        &self,
        realm: &str,
        name: &str,
        config: UserFederationServiceConfig,
    ) -> AppResult<()> {
        let mut configs = self.load_federation_configs(realm).await?;
        let index = configs
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| not_found(realm, name))?;

        if config.name != name && configs.iter().any(|c| c.name == config.name) {
            return Err(AppError::already_exists(format!(
                "user federation config '{}' already exists in realm '{realm}'",
                config.name
            )));
        }

        configs[index] = config;
        self.write_list(&self.keys.realm_user_federations(realm), &configs, true)
            .await?;
        info!(realm = %realm, federation = %name, "User federation config updated");
        Ok(())
    }

    pub(super) async fn remove_federation_config(&self, realm: &str, name: &str) -> AppResult<()> {
        match self
            .remove_entry(
                REALM_USER_FEDERATIONS,
                &self.keys.realm_user_federations(realm),
                |c: &UserFederationServiceConfig| c.name == name,
            )
            .await
        {
            Ok(_) => {
                info!(realm = %realm, federation = %name, "User federation config deleted");
                Ok(())
            }
            Err(e) if e.is(ErrorKind::ZeroLength) || e.is(ErrorKind::NotFound) => {
                Err(not_found(realm, name))
            }
            Err(e) => Err(e),
        }
    }
}

fn not_found(realm: &str, name: &str) -> AppError {
    AppError::not_found(format!(
        "user federation config '{name}' not found in realm '{realm}'"
    ))
}

#[cfg(test)]
mod tests {
    use ferrum_core::ErrorKind;
    use ferrum_entity::federation::{UserFederationServiceConfig, UserFederationServiceType};
    use ferrum_entity::realm::Realm;

    use crate::contract::IdentityStore;
    use crate::kv::KvIdentityStore;
    use crate::kv::test_support::make_store;

    fn make_config(name: &str) -> UserFederationServiceConfig {
        UserFederationServiceConfig {
            kind: UserFederationServiceType::Ldap,
            url: "ldap://ldap.example.com:389".to_string(),
            name: name.to_string(),
            sys_user: String::new(),
            sys_password: String::new(),
            entry_point: "dc=example,dc=com".to_string(),
        }
    }

    async fn make_realm_store() -> KvIdentityStore {
        let (store, _) = make_store();
        store.create_realm(Realm::new("r1", 300, 600)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_no_configs_is_empty() {
        let store = make_realm_store().await;
        assert!(store.get_user_federation_configs("r1").await.unwrap().is_empty());
        assert_eq!(
            store
                .get_user_federation_config("r1", "corp")
                .await
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let store = make_realm_store().await;
        store
            .create_user_federation_config("r1", make_config("corp"))
            .await
            .unwrap();
        store
            .create_user_federation_config("r1", make_config("lab"))
            .await
            .unwrap();

        let corp = store.get_user_federation_config("r1", "corp").await.unwrap();
        assert!(corp.is_anonymous_access());

        let mut changed = corp.clone();
        changed.sys_user = "cn=admin".to_string();
        store
            .update_user_federation_config("r1", "corp", changed)
            .await
            .unwrap();
        assert!(
            !store
                .get_user_federation_config("r1", "corp")
                .await
                .unwrap()
                .is_anonymous_access()
        );

        store.delete_user_federation_config("r1", "corp").await.unwrap();
        let names: Vec<String> = store
            .get_user_federation_configs("r1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["lab"]);
    }

    #[tokio::test]
    async fn test_duplicate_config_rejected() {
        let store = make_realm_store().await;
        store
            .create_user_federation_config("r1", make_config("corp"))
            .await
            .unwrap();
        let err = store
            .create_user_federation_config("r1", make_config("corp"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_config_needs_realm() {
        let (store, _) = make_store();
        let err = store
            .create_user_federation_config("nope", make_config("corp"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_missing_config() {
        let store = make_realm_store().await;
        let err = store
            .delete_user_federation_config("r1", "corp")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
