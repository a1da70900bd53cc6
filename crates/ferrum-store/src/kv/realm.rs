//! Realm operations of the key-value store.

use std::collections::HashSet;

use tracing::info;

use ferrum_auth::password::{PasswordEncoder, generate_salt};
use ferrum_core::ErrorKind;
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_entity::identifier::ExtendedIdentifier;
use ferrum_entity::realm::Realm;

use super::{CLIENT, KvIdentityStore, REALM, REALM_CLIENTS, REALM_USERS, USER};

impl KvIdentityStore {
    pub(crate) async fn get_realm_object(&self, realm: &str) -> AppResult<Realm> {
        self.get_object(REALM, &self.keys.realm(realm)).await
    }

    /// Persist a realm with embedded clients and users.
    ///
    /// With `hash_passwords` a fresh salt is generated and every user
    /// password is hashed under it; otherwise the realm salt and the stored
    /// hashes are kept as given.
    pub(super) async fn store_realm(&self, mut realm: Realm, hash_passwords: bool) -> AppResult<()> {
        let name = realm.name.clone();
        if self.exists(&self.keys.realm(&name)).await? {
            return Err(AppError::already_exists(format!("realm '{name}' already exists")));
        }

        // Validate every user id before anything is written.
        let user_ids = realm
            .users
            .iter()
            .map(|user| -> AppResult<ExtendedIdentifier> {
                Ok(ExtendedIdentifier::new(user.id()?, user.username()))
            })
            .collect::<AppResult<Vec<_>>>()?;
        if let Some(dup) = first_duplicate(realm.clients.iter().map(|c| c.name.as_str())) {
            return Err(AppError::already_exists(format!(
                "client '{dup}' is listed twice in realm '{name}'"
            )));
        }
        if let Some(dup) = first_duplicate(user_ids.iter().map(|u| u.name.as_str())) {
            return Err(AppError::already_exists(format!(
                "user '{dup}' is listed twice in realm '{name}'"
            )));
        }

        if !realm.clients.is_empty() {
            let mut client_ids = Vec::with_capacity(realm.clients.len());
            for client in &realm.clients {
                self.put_object(&self.keys.client(&name, &client.name), client)
                    .await?;
                client_ids.push(ExtendedIdentifier::new(client.id, &client.name));
            }
            self.write_list(&self.keys.realm_clients(&name), &client_ids, true)
                .await?;
        }

        if hash_passwords {
            realm.password_salt = generate_salt();
        }
        let encoder = PasswordEncoder::for_realm(&realm);

        if !realm.users.is_empty() {
            for user in &mut realm.users {
                if hash_passwords {
                    if let Some(hash) = user.password_hash().map(|p| encoder.hash(p)) {
                        user.set_password_hash(hash);
                    }
                }
                self.put_object(&self.keys.user(&name, user.username()), &*user)
                    .await?;
            }
            self.write_list(&self.keys.realm_users(&name), &user_ids, true)
                .await?;
        }

        self.put_object(&self.keys.realm(&name), &realm.short())
            .await?;

        info!(
            realm = %name,
            clients = realm.clients.len(),
            users = realm.users.len(),
            "Realm created"
        );
        Ok(())
    }

    pub(super) async fn remove_realm(&self, realm: &str) -> AppResult<()> {
        self.delete_object(REALM, &self.keys.realm(realm)).await?;

        match self
            .read_list::<ExtendedIdentifier>(REALM_CLIENTS, &self.keys.realm_clients(realm))
            .await
        {
            Ok(clients) => {
                for client in &clients {
                    self.delete_object(CLIENT, &self.keys.client(realm, &client.name))
                        .await?;
                }
                self.delete_object(REALM_CLIENTS, &self.keys.realm_clients(realm))
                    .await?;
            }
            Err(e) if e.is(ErrorKind::ZeroLength) => {}
            Err(e) => return Err(e),
        }

        match self
            .read_list::<ExtendedIdentifier>(REALM_USERS, &self.keys.realm_users(realm))
            .await
        {
            Ok(users) => {
                for user in &users {
                    self.delete_object(USER, &self.keys.user(realm, &user.name))
                        .await?;
                }
                self.delete_object(REALM_USERS, &self.keys.realm_users(realm))
                    .await?;
            }
            Err(e) if e.is(ErrorKind::ZeroLength) => {}
            Err(e) => return Err(e),
        }

        // Federation configs live only in their list.
        self.kv
            .delete(&self.keys.realm_user_federations(realm))
            .await?;

        info!(realm = %realm, "Realm deleted");
        Ok(())
    }

    /// Replace realm metadata; a rename moves clients and users along.
    ///
    /// The password salt cannot change through an update, so stored hashes
    /// stay valid.
    pub(super) async fn replace_realm(&self, realm: &str, new_realm: Realm) -> AppResult<()> {
        let old = self.get_realm_object(realm).await?;

        if old.name == new_realm.name {
            let updated = Realm {
                password_salt: old.password_salt,
                ..new_realm.short()
            };
            self.put_object(&self.keys.realm(realm), &updated).await?;
            info!(realm = %realm, "Realm updated");
            return Ok(());
        }

        if self.exists(&self.keys.realm(&new_realm.name)).await? {
            return Err(AppError::already_exists(format!(
                "realm '{}' already exists",
                new_realm.name
            )));
        }

        let clients = match self.load_clients(&old.name).await {
            Ok(clients) => clients,
            Err(e) if e.is(ErrorKind::ZeroLength) => Vec::new(),
            Err(e) => return Err(e),
        };
        let users = match self.load_users(&old.name).await {
            Ok(users) => users,
            Err(e) if e.is(ErrorKind::ZeroLength) => Vec::new(),
            Err(e) => return Err(e),
        };
        let federations = self.load_federation_configs(&old.name).await?;

        let moved = Realm {
            clients,
            users,
            password_salt: old.password_salt,
            ..new_realm
        };
        let new_name = moved.name.clone();

        self.remove_realm(&old.name).await?;
        self.store_realm(moved, false).await?;
        if !federations.is_empty() {
            self.write_list(&self.keys.realm_user_federations(&new_name), &federations, true)
                .await?;
        }

        info!(realm = %realm, new_name = %new_name, "Realm renamed");
        Ok(())
    }
}

fn first_duplicate<'a>(mut names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.find(|name| !seen.insert(*name))
}
