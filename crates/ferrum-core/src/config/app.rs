//! Server and TLS configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// URL schema the server is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// Server configuration. Also determines the token issuer URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Published schema.
    #[serde(default = "default_schema")]
    pub schema: Schema,
    /// Published address (host name or IP).
    #[serde(default = "default_address")]
    pub address: String,
    /// Published port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Certificate pair, required for `https`.
    #[serde(default)]
    pub security: Option<SecurityConfig>,
}

/// TLS certificate pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Path to the PEM certificate.
    pub certificate_file: String,
    /// Path to the PEM private key.
    pub key_file: String,
}

impl ServerConfig {
    /// Base URL of the server, e.g. `http://localhost:8182`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.schema, self.address, self.port)
    }

    /// Issuer URL of tokens minted for `realm`.
    pub fn issuer(&self, realm: &str) -> String {
        format!("{}/auth/realms/{realm}", self.base_url())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            address: default_address(),
            port: default_port(),
            security: None,
        }
    }
}

fn default_schema() -> Schema {
    Schema::Http
}

fn default_address() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8182
}
