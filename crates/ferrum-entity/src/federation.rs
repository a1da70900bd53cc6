//! External user directory (federation) configuration.

use serde::{Deserialize, Serialize};

/// Directory protocol of a federation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserFederationServiceType {
    /// Generic LDAP / Active Directory.
    Ldap,
    /// FreeIPA.
    FreeIpa,
}

/// Connection settings for a user federation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFederationServiceConfig {
    /// Directory protocol.
    #[serde(rename = "type")]
    pub kind: UserFederationServiceType,
    /// Base URL of the directory.
    pub url: String,
    /// Unique name across all federation services of a realm.
    pub name: String,
    /// Bind user; empty means anonymous access.
    #[serde(default)]
    pub sys_user: String,
    /// Bind password.
    #[serde(default)]
    pub sys_password: String,
    /// Catalog to search in, e.g. `dc=example,dc=com`.
    #[serde(default)]
    pub entry_point: String,
}

impl UserFederationServiceConfig {
    /// Whether the directory is accessed without a bind user.
    pub fn is_anonymous_access(&self) -> bool {
        self.sys_user.is_empty()
    }
}
