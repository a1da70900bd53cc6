//! # ferrum-store
//!
//! Identity store implementations for Ferrum. Supports three modes:
//!
//! - **redis**: read-write store over Redis using the [redis](https://crates.io/crates/redis) crate
//! - **memory**: the same read-write store over an in-process key-value map
//! - **file**: read-only store loaded from a JSON document at startup
//!
//! The backend is selected at runtime based on configuration.

pub mod contract;
pub mod file;
pub mod keys;
pub mod kv;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use contract::IdentityStore;
pub use file::FileIdentityStore;
pub use kv::KvIdentityStore;
pub use provider::StoreManager;
