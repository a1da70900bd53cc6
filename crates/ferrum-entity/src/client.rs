//! Realm client entity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Security type of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    /// Identified by client id alone.
    Public,
    /// Must present a client secret.
    Confidential,
}

/// How a confidential client authenticates. Encoded as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AuthenticationType {
    /// No authentication data (public clients).
    #[default]
    Unset = 0,
    /// `value` holds the client secret.
    ClientIdAndSecrets = 1,
}

impl Serialize for AuthenticationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for AuthenticationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Unset),
            1 => Ok(Self::ClientIdAndSecrets),
            other => Err(serde::de::Error::custom(format!(
                "unknown authentication type {other}"
            ))),
        }
    }
}

/// Authentication descriptor of a client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Authentication {
    /// Authentication kind.
    #[serde(rename = "type", default)]
    pub kind: AuthenticationType,
    /// Secret value for [`AuthenticationType::ClientIdAndSecrets`].
    #[serde(default)]
    pub value: String,
    /// Free-form extra attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}

/// A registered application in a realm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Generated client identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Client name, unique within a realm. Presented as `client_id`.
    pub name: String,
    /// Public or confidential.
    #[serde(rename = "type")]
    pub kind: ClientType,
    /// Authentication descriptor.
    #[serde(default)]
    pub auth: Authentication,
}

impl Client {
    /// Create a public client with a fresh id.
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: ClientType::Public,
            auth: Authentication::default(),
        }
    }

    /// Create a confidential client authenticating with `secret`.
    pub fn confidential(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: ClientType::Confidential,
            auth: Authentication {
                kind: AuthenticationType::ClientIdAndSecrets,
                value: secret.into(),
                attributes: None,
            },
        }
    }

    /// Whether `secret` authenticates this client.
    ///
    /// Public clients always pass; confidential clients require a
    /// client-id-and-secret descriptor with an equal value.
    pub fn accepts_secret(&self, secret: Option<&str>) -> bool {
        match self.kind {
            ClientType::Public => true,
            ClientType::Confidential => {
                self.auth.kind == AuthenticationType::ClientIdAndSecrets
                    && secret.is_some_and(|s| s == self.auth.value)
            }
        }
    }
}
