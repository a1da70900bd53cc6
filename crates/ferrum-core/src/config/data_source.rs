//! Data source (identity store backend) configuration.

use serde::{Deserialize, Serialize};

/// Which identity store backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceType {
    /// Read-only JSON file.
    File,
    /// Read-write Redis store.
    Redis,
    /// Read-write in-process store.
    Memory,
}

/// Top-level data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Backend type: `"file"`, `"redis"`, or `"memory"`.
    #[serde(rename = "type", default = "default_type")]
    pub kind: DataSourceType,
    /// Path to the data file when `type = "file"`.
    #[serde(default)]
    pub source: Option<String>,
    /// Key namespace for key-value backends.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Redis-specific settings.
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Redis backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Upper bound for a single Redis command, in milliseconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            operation_timeout_ms: default_operation_timeout(),
        }
    }
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            kind: default_type(),
            source: None,
            namespace: default_namespace(),
            redis: RedisConfig::default(),
        }
    }
}

fn default_type() -> DataSourceType {
    DataSourceType::Memory
}

fn default_namespace() -> String {
    "fe".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_operation_timeout() -> u64 {
    3000
}
