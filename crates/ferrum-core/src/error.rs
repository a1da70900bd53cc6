//! Unified application error types for Ferrum.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested entity was not found.
    NotFound,
    /// A uniqueness constraint was violated on create.
    AlreadyExists,
    /// An association list is absent or empty.
    ZeroLength,
    /// An association list names objects that are missing from the store.
    NotAll,
    /// The data provider backend is unreachable.
    ProviderUnavailable,
    /// Client id or client secret did not validate.
    InvalidClient,
    /// Username or password did not validate.
    InvalidUserCredentials,
    /// The caller presented an expired or unknown token.
    Unauthorized,
    /// Input validation failed.
    Validation,
    /// The requested feature or operation is not implemented.
    NotImplemented,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A backend storage or I/O error occurred.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// Token signing or decoding failed.
    Token,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::AlreadyExists => write!(f, "ALREADY_EXISTS"),
            Self::ZeroLength => write!(f, "ZERO_LENGTH"),
            Self::NotAll => write!(f, "NOT_ALL"),
            Self::ProviderUnavailable => write!(f, "PROVIDER_UNAVAILABLE"),
            Self::InvalidClient => write!(f, "INVALID_CLIENT"),
            Self::InvalidUserCredentials => write!(f, "INVALID_USER_CREDENTIALS"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Token => write!(f, "TOKEN"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Ferrum.
///
/// Store adapters map backend errors into `AppError` at their boundary and
/// attach the failing operation name with [`AppError::context`]; the
/// authorization engine inspects [`AppError::kind`] to decide what reaches
/// the caller.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an already-exists error.
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    /// Create a zero-length association error.
    pub fn zero_length(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ZeroLength, message)
    }

    /// Create a partially-missing association error.
    pub fn not_all(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAll, message)
    }

    /// Create a provider-unavailable error for the named backend.
    pub fn provider_unavailable(provider: &str, address: &str) -> Self {
        Self::new(
            ErrorKind::ProviderUnavailable,
            format!("data provider '{provider}' at '{address}' is not available"),
        )
    }

    /// Create an invalid-client error.
    pub fn invalid_client(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidClient, message)
    }

    /// Create an invalid-user-credentials error.
    pub fn invalid_user_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidUserCredentials, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-implemented error.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a token error.
    pub fn token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Token, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Prefix the message with the failing operation, keeping kind and source.
    pub fn context(mut self, operation: &str) -> Self {
        self.message = format!("{operation} failed: {}", self.message);
        self
    }

    /// OAuth2 error code for this error, as used in token endpoint responses.
    pub fn oauth_error(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidClient => "invalid_client",
            ErrorKind::InvalidUserCredentials => "invalid_grant",
            ErrorKind::Unauthorized => "invalid_token",
            ErrorKind::Validation => "invalid_request",
            ErrorKind::NotImplemented => "unsupported_grant_type",
            ErrorKind::ProviderUnavailable => "temporarily_unavailable",
            _ => "server_error",
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
