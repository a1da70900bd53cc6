//! In-memory key-value store using the dashmap crate.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_core::traits::kv::KeyValueStore;

/// A stored value: a string or a list of strings.
#[derive(Debug, Clone)]
enum Entry {
    Value(String),
    List(Vec<String>),
}

/// In-process [`KeyValueStore`] with Redis string and list semantics.
///
/// Reading a list as a string (or the reverse) fails like Redis `WRONGTYPE`.
/// [`MemoryKeyValueStore::set_available`] simulates an unreachable server:
/// every command then fails.
#[derive(Debug)]
pub struct MemoryKeyValueStore {
    /// Key space.
    entries: DashMap<String, Entry>,
    /// Whether commands are served.
    available: AtomicBool,
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKeyValueStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Switch command serving on or off.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        debug!(available, "Memory key-value store availability changed");
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::storage("memory store: connection refused"))
        }
    }

    fn wrong_type(key: &str) -> AppError {
        AppError::storage(format!(
            "WRONGTYPE Operation against a key holding the wrong kind of value: '{key}'"
        ))
    }

    fn read_value(&self, key: &str) -> AppResult<Option<String>> {
        match self.entries.get(key).as_deref() {
            None => Ok(None),
            Some(Entry::Value(value)) => Ok(Some(value.clone())),
            Some(Entry::List(_)) => Err(Self::wrong_type(key)),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.check_available()?;
        self.read_value(key)
    }

    async fn mget(&self, keys: &[String]) -> AppResult<Vec<Option<String>>> {
        self.check_available()?;
        // MGET reports keys of another type as missing.
        Ok(keys
            .iter()
            .map(|key| self.read_value(key).ok().flatten())
            .collect())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.check_available()?;
        self.entries
            .insert(key.to_string(), Entry::Value(value.to_string()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<u64> {
        self.check_available()?;
        Ok(u64::from(self.entries.remove(key).is_some()))
    }

    async fn rpush(&self, key: &str, value: &str) -> AppResult<()> {
        self.check_available()?;
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));
        match entry.value_mut() {
            Entry::List(items) => {
                items.push(value.to_string());
                Ok(())
            }
            Entry::Value(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn lrange(&self, key: &str) -> AppResult<Vec<String>> {
        self.check_available()?;
        match self.entries.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(items.clone()),
            Some(Entry::Value(_)) => Err(Self::wrong_type(key)),
        }
    }

    async fn ping(&self) -> AppResult<bool> {
        self.check_available()?;
        Ok(true)
    }

    fn describe(&self) -> (&'static str, String) {
        ("memory", "in-process".to_string())
    }
}
