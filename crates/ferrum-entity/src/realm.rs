//! Realm entity: the tenant boundary.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::federation::UserFederationServiceConfig;
use crate::user::UserDocument;

/// An isolated tenant namespace with its own clients and users.
///
/// The read-write store persists realms without embedded `clients` and
/// `users` and links them through association lists instead; the read-only
/// file store keeps them embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realm {
    /// Unique, case-sensitive realm name.
    pub name: String,
    /// Embedded clients (only when creating a realm or in file data).
    #[serde(default)]
    pub clients: Vec<Client>,
    /// Embedded user documents (only when creating a realm or in file data).
    #[serde(default)]
    pub users: Vec<UserDocument>,
    /// Access token lifetime in seconds.
    pub token_expiration: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_expiration: u64,
    /// Federation services users of this realm may come from.
    #[serde(default)]
    pub user_federation_services: Vec<UserFederationServiceConfig>,
    /// Per-realm salt of the password encoder.
    #[serde(default)]
    pub password_salt: String,
}

impl Realm {
    /// Create an empty realm with the given token lifetimes.
    pub fn new(name: impl Into<String>, token_expiration: u64, refresh_expiration: u64) -> Self {
        Self {
            name: name.into(),
            clients: Vec::new(),
            users: Vec::new(),
            token_expiration,
            refresh_expiration,
            user_federation_services: Vec::new(),
            password_salt: String::new(),
        }
    }

    /// Copy of this realm stripped of embedded clients and users.
    pub fn short(&self) -> Self {
        Self {
            clients: Vec::new(),
            users: Vec::new(),
            ..self.clone()
        }
    }
}
