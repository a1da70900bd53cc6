//! Error body returned to callers of the engine.

use serde::{Deserialize, Serialize};

use ferrum_core::ErrorKind;
use ferrum_core::error::AppError;

pub const INVALID_CLIENT_MSG: &str = "Invalid client";
pub const INVALID_CLIENT_CREDENTIALS_DESC: &str = "Invalid client credentials";
pub const INVALID_USER_CREDENTIALS_MSG: &str = "invalid grant";
pub const INVALID_USER_CREDENTIALS_DESC: &str = "Invalid user credentials";
pub const INVALID_TOKEN_MSG: &str = "Invalid token";
pub const INVALID_TOKEN_DESC: &str = "Token verification failed";
pub const INVALID_REQUEST_MSG: &str = "Invalid request";

/// Public error message and description.
///
/// Client and credential failures only ever produce their fixed public
/// pair, so callers cannot tell an unknown client from a wrong secret or
/// an unknown user from a wrong password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// OAuth2 error code, e.g. `invalid_client`.
    pub error: String,
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(rename = "description", default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ErrorDetails {
    /// Public view of an engine error.
    pub fn from_error(err: &AppError) -> Self {
        let (message, description) = match err.kind {
            ErrorKind::InvalidClient => (INVALID_CLIENT_MSG, INVALID_CLIENT_CREDENTIALS_DESC),
            ErrorKind::InvalidUserCredentials => {
                (INVALID_USER_CREDENTIALS_MSG, INVALID_USER_CREDENTIALS_DESC)
            }
            ErrorKind::Unauthorized => (INVALID_TOKEN_MSG, INVALID_TOKEN_DESC),
            ErrorKind::Validation => (INVALID_REQUEST_MSG, err.message.as_str()),
            _ => (err.message.as_str(), ""),
        };

        Self {
            error: err.oauth_error().to_string(),
            message: message.to_string(),
            description: description.to_string(),
        }
    }
}

impl From<&AppError> for ErrorDetails {
    fn from(err: &AppError) -> Self {
        Self::from_error(err)
    }
}
