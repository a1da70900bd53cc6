//! # ferrum-core
//!
//! Core crate for the Ferrum authorization server. Contains configuration
//! schemas, the key-value backend trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Ferrum crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
