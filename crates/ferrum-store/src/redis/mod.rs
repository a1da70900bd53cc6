//! Redis key-value backend.

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisKeyValueStore;
