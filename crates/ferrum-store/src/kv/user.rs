//! User operations of the key-value store.

use tracing::{debug, error, info};
use uuid::Uuid;

use ferrum_auth::password::PasswordEncoder;
use ferrum_core::ErrorKind;
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_entity::identifier::ExtendedIdentifier;
use ferrum_entity::user::UserDocument;

use super::{KvIdentityStore, REALM_USERS, USER};

impl KvIdentityStore {
    pub(super) async fn load_users(&self, realm: &str) -> AppResult<Vec<UserDocument>> {
        let members: Vec<ExtendedIdentifier> = self
            .read_list(REALM_USERS, &self.keys.realm_users(realm))
            .await?;
        let keys: Vec<String> = members
            .iter()
            .map(|m| self.keys.user(realm, &m.name))
            .collect();
        self.get_objects(USER, &keys).await
    }

    pub(super) async fn load_user(&self, realm: &str, username: &str) -> AppResult<UserDocument> {
        self.get_object(USER, &self.keys.user(realm, username)).await
    }

    /// Users are keyed by name, so lookup by id goes through the realm's
    /// association list.
    pub(super) async fn load_user_by_id(&self, realm: &str, id: Uuid) -> AppResult<UserDocument> {
        let members: Vec<ExtendedIdentifier> = self
            .read_list(REALM_USERS, &self.keys.realm_users(realm))
            .await?;
        let member = members.iter().find(|m| m.id == id).ok_or_else(|| {
            AppError::not_found(format!("user with id '{id}' not found in realm '{realm}'"))
        })?;
        self.load_user(realm, &member.name).await.map_err(|e| {
            if e.is(ErrorKind::NotFound) {
                error!(realm = %realm, user_id = %id, "Realm links a user the store does not have");
            }
            e
        })
    }

    pub(super) async fn insert_user(&self, realm: &str, mut user: UserDocument) -> AppResult<()> {
        let stored_realm = self.get_realm_object(realm).await?;
        let id = user.id()?;

        let key = self.keys.user(realm, user.username());
        if self.exists(&key).await? {
            return Err(AppError::already_exists(format!(
                "user '{}' already exists in realm '{realm}'",
                user.username()
            )));
        }

        let encoder = PasswordEncoder::for_realm(&stored_realm);
        if let Some(hash) = user.password_hash().map(|p| encoder.hash(p)) {
            user.set_password_hash(hash);
        }

        self.put_object(&key, &user).await?;
        self.append_entry(
            &self.keys.realm_users(realm),
            &ExtendedIdentifier::new(id, user.username()),
        )
        .await?;

        info!(realm = %realm, username = %user.username(), user_id = %id, "User created");
        Ok(())
    }

    pub(super) async fn replace_user(
        &self,
        realm: &str,
        username: &str,
        user: UserDocument,
    ) -> AppResult<()> {
        let old = self.load_user(realm, username).await?;
        let new_id = user.id()?;

        if old.username() != user.username()
            && self.exists(&self.keys.user(realm, user.username())).await?
        {
            return Err(AppError::already_exists(format!(
                "user '{}' already exists in realm '{realm}'",
                user.username()
            )));
        }

        if old.id()? != new_id || old.username() != user.username() {
            self.remove_user(realm, old.username()).await?;
            self.append_entry(
                &self.keys.realm_users(realm),
                &ExtendedIdentifier::new(new_id, user.username()),
            )
            .await?;
        }

        self.put_object(&self.keys.user(realm, user.username()), &user)
            .await?;
        info!(realm = %realm, username = %user.username(), "User updated");
        Ok(())
    }

    pub(super) async fn remove_user(&self, realm: &str, username: &str) -> AppResult<()> {
        self.delete_object(USER, &self.keys.user(realm, username))
            .await?;

        match self
            .remove_entry(
                REALM_USERS,
                &self.keys.realm_users(realm),
                |m: &ExtendedIdentifier| m.name == username,
            )
            .await
        {
            Ok(_) => {}
            Err(e) if e.is(ErrorKind::NotFound) || e.is(ErrorKind::ZeroLength) => {
                debug!(realm = %realm, username = %username, "User was not linked to its realm");
            }
            Err(e) => return Err(e),
        }

        info!(realm = %realm, username = %username, "User deleted");
        Ok(())
    }

    pub(super) async fn store_password(
        &self,
        realm: &str,
        username: &str,
        password: &str,
    ) -> AppResult<()> {
        let stored_realm = self.get_realm_object(realm).await?;
        let mut user = self.load_user(realm, username).await?;

        user.set_password_hash(PasswordEncoder::for_realm(&stored_realm).hash(password));
        self.put_object(&self.keys.user(realm, username), &user)
            .await?;

        info!(realm = %realm, username = %username, "Password changed");
        Ok(())
    }
}
