//! Token introspection result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `aud` claim, which may be a single string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    fn from_claim(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::One(s.clone())),
            Value::Array(items) => Some(Self::Many(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// Introspection response. Fields other than `active` are omitted when
/// absent, and an inactive token reports nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectTokenResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl IntrospectTokenResult {
    /// Result for an unknown, expired or forged token.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Active result built from the verified claims of a token.
    pub fn from_claims(claims: &Map<String, Value>) -> Self {
        let int = |name: &str| claims.get(name).and_then(Value::as_i64);
        let text = |name: &str| claims.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            exp: int("exp"),
            nbf: int("nbf"),
            iat: int("iat"),
            aud: claims.get("aud").and_then(Audience::from_claim),
            active: true,
            auth_time: int("auth_time"),
            jti: text("jti"),
            typ: text("typ"),
        }
    }
}
