//! Convenience result type alias for Ferrum.

use crate::error::AppError;

/// A specialized `Result` type for Ferrum operations.
pub type AppResult<T> = Result<T, AppError>;
