//! Token endpoint input and output.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `grant_type` of the resource owner password grant.
pub const GRANT_TYPE_PASSWORD: &str = "password";
/// `grant_type` of the refresh grant.
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";

/// Form fields posted to the token endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGenerationData {
    /// Client name within the realm.
    pub client_id: String,
    /// Secret of a confidential client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// `password` or `refresh_token`.
    pub grant_type: String,
    /// Requested scope, echoed into tokens as given.
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl TokenGenerationData {
    /// Password grant input.
    pub fn password(
        client_id: impl Into<String>,
        client_secret: Option<&str>,
        username: impl Into<String>,
        password: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.map(str::to_string),
            grant_type: GRANT_TYPE_PASSWORD.to_string(),
            scope: scope.into(),
            username: username.into(),
            password: password.into(),
            refresh_token: String::new(),
        }
    }

    /// Refresh grant input.
    pub fn refresh(
        client_id: impl Into<String>,
        client_secret: Option<&str>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.map(str::to_string),
            grant_type: GRANT_TYPE_REFRESH_TOKEN.to_string(),
            refresh_token: refresh_token.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for TokenGenerationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGenerationData")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("grant_type", &self.grant_type)
            .field("scope", &self.scope)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Successful token endpoint response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_expires_in: u64,
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    #[serde(rename = "not-before-policy")]
    pub not_before_policy: i64,
    /// Id of the session the tokens belong to.
    pub session_state: Uuid,
    pub scope: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("expires_in", &self.expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .field("token_type", &self.token_type)
            .field("session_state", &self.session_state)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
