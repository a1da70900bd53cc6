//! Key-value backend trait underneath the read-write identity store.

use async_trait::async_trait;

use crate::result::AppResult;

/// Minimal command set of a Redis-like key-value server.
///
/// Values are strings (JSON). Lists are ordered sequences of strings that
/// only support appending and full reads; there is no positional edit.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a string value. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Get several string values at once, preserving the order of `keys`.
    async fn mget(&self, keys: &[String]) -> AppResult<Vec<Option<String>>>;

    /// Set a string value, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key of any type. Returns the number of keys removed.
    async fn delete(&self, key: &str) -> AppResult<u64>;

    /// Append a value to the list at `key`, creating it if absent.
    async fn rpush(&self, key: &str, value: &str) -> AppResult<()>;

    /// Read the whole list at `key`. Absent keys read as an empty list.
    async fn lrange(&self, key: &str) -> AppResult<Vec<String>>;

    /// Liveness probe.
    async fn ping(&self) -> AppResult<bool>;

    /// Human-readable backend name and address, for error messages.
    fn describe(&self) -> (&'static str, String);
}
