//! Store manager that builds the configured identity store backend.

use std::sync::Arc;

use tracing::info;

use ferrum_core::config::data_source::{DataSourceConfig, DataSourceType};
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;

use crate::contract::IdentityStore;
use crate::file::FileIdentityStore;
use crate::kv::KvIdentityStore;

/// Selects and constructs the identity store backend.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner identity store.
    inner: Arc<dyn IdentityStore>,
}

impl StoreManager {
    /// Create a store manager from configuration.
    pub async fn new(config: &DataSourceConfig) -> AppResult<Self> {
        let inner: Arc<dyn IdentityStore> = match config.kind {
            DataSourceType::File => {
                let path = config.source.as_deref().ok_or_else(|| {
                    AppError::configuration("data_source.source is required for the file backend")
                })?;
                info!(path = %path, "Initializing file identity store");
                Arc::new(FileIdentityStore::open(path).await?)
            }
            #[cfg(feature = "redis-backend")]
            DataSourceType::Redis => {
                info!(namespace = %config.namespace, "Initializing Redis identity store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                let backend = crate::redis::RedisKeyValueStore::new(client);
                Arc::new(KvIdentityStore::new(Arc::new(backend), config.namespace.clone()))
            }
            #[cfg(feature = "memory")]
            DataSourceType::Memory => {
                info!(namespace = %config.namespace, "Initializing in-memory identity store");
                let backend = crate::memory::MemoryKeyValueStore::new();
                Arc::new(KvIdentityStore::new(Arc::new(backend), config.namespace.clone()))
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "Data source type {other:?} is not compiled into this build"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn IdentityStore>) -> Self {
        Self { inner: store }
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<dyn IdentityStore> {
        Arc::clone(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_core::ErrorKind;
    use ferrum_entity::realm::Realm;

    #[tokio::test]
    async fn test_memory_backend() {
        let manager = StoreManager::new(&DataSourceConfig::default()).await.unwrap();
        let store = manager.store();
        assert!(store.is_available().await);
        store.create_realm(Realm::new("r1", 10, 20)).await.unwrap();
        assert_eq!(store.get_realm("r1").await.unwrap().refresh_expiration, 20);
    }

    #[tokio::test]
    async fn test_file_backend_requires_source() {
        let config = DataSourceConfig {
            kind: DataSourceType::File,
            ..DataSourceConfig::default()
        };
        let err = StoreManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
