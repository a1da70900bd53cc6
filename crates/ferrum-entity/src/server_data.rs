//! Document format of the read-only file store.

use serde::{Deserialize, Serialize};

use crate::realm::Realm;

/// All realms of a server, with clients and users embedded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerData {
    /// Realms served by this instance.
    #[serde(default)]
    pub realms: Vec<Realm>,
}
