//! User entity: an opaque document behind a narrow capability view.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;

const INFO: &str = "info";
const CREDENTIALS: &str = "credentials";
const FEDERATION: &str = "federation";

/// A stored user.
///
/// The document is free-form except for a required `info` object holding
/// `preferred_username` (and normally `sub`), an optional `credentials`
/// object holding `password`, and an optional `federation` object naming
/// the directory the user comes from. Only [`UserDocument::public_info`]
/// may leave the server inside tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct UserDocument {
    raw: Value,
    username: String,
}

impl UserDocument {
    /// Wrap a document, checking the required shape.
    pub fn new(raw: Value) -> AppResult<Self> {
        let username = raw
            .get(INFO)
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::validation("user document has no 'info' object"))?
            .get("preferred_username")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::validation("user document has no 'info.preferred_username'"))?
            .to_string();

        if let Some(credentials) = raw.get(CREDENTIALS) {
            if !credentials.is_object() {
                return Err(AppError::validation("'credentials' must be an object"));
            }
        }

        Ok(Self { raw, username })
    }

    /// Parse a document from its JSON text.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// The `preferred_username` of the user.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The stored password hash, if the user has credentials.
    pub fn password_hash(&self) -> Option<&str> {
        self.raw
            .get(CREDENTIALS)
            .and_then(|c| c.get("password"))
            .and_then(Value::as_str)
    }

    /// The user id from `info.sub`.
    pub fn id(&self) -> AppResult<Uuid> {
        let sub = self
            .raw
            .get(INFO)
            .and_then(|i| i.get("sub"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::validation(format!("user '{}' has no 'info.sub'", self.username))
            })?;
        Uuid::parse_str(sub).map_err(|_| {
            AppError::validation(format!(
                "user '{}' has a 'sub' that is not a UUID: '{sub}'",
                self.username
            ))
        })
    }

    /// The `info` object. Never contains credentials.
    pub fn public_info(&self) -> Map<String, Value> {
        self.raw
            .get(INFO)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// The whole document.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The whole document serialized as JSON text.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(&self.raw)?)
    }

    /// Whether the user is backed by an external directory.
    pub fn is_federated(&self) -> bool {
        self.raw.get(FEDERATION).is_some_and(Value::is_object)
    }

    /// Name of the federation service of a federated user.
    pub fn federation_name(&self) -> Option<&str> {
        self.raw
            .get(FEDERATION)
            .and_then(|f| f.get("name"))
            .and_then(Value::as_str)
    }

    /// Replace the stored password hash, creating `credentials` if needed.
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        if let Value::Object(doc) = &mut self.raw {
            let credentials = doc
                .entry(CREDENTIALS)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(credentials) = credentials {
                credentials.insert("password".to_string(), Value::String(hash.into()));
            }
        }
    }
}

impl TryFrom<Value> for UserDocument {
    type Error = AppError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<UserDocument> for Value {
    fn from(user: UserDocument) -> Self {
        user.raw
    }
}
