//! Token signing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Signing key source for HS256 tokens.
///
/// `secret_file` takes precedence over the inline `signing_key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to a file whose raw bytes are the signing key.
    #[serde(default)]
    pub secret_file: Option<String>,
    /// Inline signing key, for development setups.
    #[serde(default)]
    pub signing_key: Option<String>,
}

impl AuthConfig {
    /// Resolve the signing key bytes.
    pub fn resolve_signing_key(&self) -> AppResult<Vec<u8>> {
        let key = match (&self.secret_file, &self.signing_key) {
            (Some(path), _) => std::fs::read(path).map_err(|e| {
                AppError::with_source(
                    crate::error::ErrorKind::Configuration,
                    format!("Failed to read secret file '{path}'"),
                    e,
                )
            })?,
            (None, Some(inline)) => inline.as_bytes().to_vec(),
            (None, None) => {
                return Err(AppError::configuration(
                    "auth.secret_file or auth.signing_key must be set",
                ));
            }
        };

        if key.is_empty() {
            return Err(AppError::configuration("Signing key is empty"));
        }
        Ok(key)
    }
}
