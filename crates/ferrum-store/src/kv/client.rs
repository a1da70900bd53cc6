//! Client operations of the key-value store.

use tracing::{debug, info};

use ferrum_core::ErrorKind;
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_entity::client::Client;
use ferrum_entity::identifier::ExtendedIdentifier;

use super::{CLIENT, KvIdentityStore, REALM_CLIENTS};

impl KvIdentityStore {
    pub(super) async fn load_clients(&self, realm: &str) -> AppResult<Vec<Client>> {
        let members: Vec<ExtendedIdentifier> = self
            .read_list(REALM_CLIENTS, &self.keys.realm_clients(realm))
            .await?;
        let keys: Vec<String> = members
            .iter()
            .map(|m| self.keys.client(realm, &m.name))
            .collect();
        self.get_objects(CLIENT, &keys).await
    }

    pub(super) async fn load_client(&self, realm: &str, name: &str) -> AppResult<Client> {
        self.get_object(CLIENT, &self.keys.client(realm, name)).await
    }

    pub(super) async fn insert_client(&self, realm: &str, client: Client) -> AppResult<()> {
        self.get_realm_object(realm).await?;

        let key = self.keys.client(realm, &client.name);
        if self.exists(&key).await? {
            return Err(AppError::already_exists(format!(
                "client '{}' already exists in realm '{realm}'",
                client.name
            )));
        }

        self.put_object(&key, &client).await?;
        self.append_entry(
            &self.keys.realm_clients(realm),
            &ExtendedIdentifier::new(client.id, &client.name),
        )
        .await?;

        info!(realm = %realm, client_id = %client.name, "Client created");
        Ok(())
    }

    pub(super) async fn replace_client(&self, realm: &str, name: &str, client: Client) -> AppResult<()> {
        let old = self.load_client(realm, name).await?;

        if old.name != client.name && self.exists(&self.keys.client(realm, &client.name)).await? {
            return Err(AppError::already_exists(format!(
                "client '{}' already exists in realm '{realm}'",
                client.name
            )));
        }

        if old.id != client.id || old.name != client.name {
            self.remove_client(realm, &old.name).await?;
            self.append_entry(
                &self.keys.realm_clients(realm),
                &ExtendedIdentifier::new(client.id, &client.name),
            )
            .await?;
        }

        self.put_object(&self.keys.client(realm, &client.name), &client)
            .await?;
        info!(realm = %realm, client_id = %client.name, "Client updated");
        Ok(())
    }

    pub(super) async fn remove_client(&self, realm: &str, name: &str) -> AppResult<()> {
        self.delete_object(CLIENT, &self.keys.client(realm, name))
            .await?;

        match self
            .remove_entry(
                REALM_CLIENTS,
                &self.keys.realm_clients(realm),
                |m: &ExtendedIdentifier| m.name == name,
            )
            .await
        {
            Ok(_) => {}
            Err(e) if e.is(ErrorKind::NotFound) || e.is(ErrorKind::ZeroLength) => {
                debug!(realm = %realm, client_id = %name, "Client was not linked to its realm");
            }
            Err(e) => return Err(e),
        }

        info!(realm = %realm, client_id = %name, "Client deleted");
        Ok(())
    }
}
