//! Redis connection management.

use std::future::Future;
use std::time::Duration;

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::{info, warn};

use ferrum_core::config::data_source::RedisConfig;
use ferrum_core::error::{AppError, ErrorKind};
use ferrum_core::result::AppResult;

/// Redis client wrapper with connection management.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis connection manager (multiplexed, reconnecting).
    conn: ConnectionManager,
    /// Connection URL with credentials masked.
    masked_url: String,
    /// Upper bound for a single command.
    operation_timeout: Duration,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("url", &self.masked_url)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

impl RedisClient {
    /// Create a new Redis client from configuration.
    pub async fn connect(config: &RedisConfig) -> AppResult<Self> {
        let masked_url = mask_redis_url(&config.url);
        let operation_timeout = Duration::from_millis(config.operation_timeout_ms);
        info!(url = %masked_url, "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to create Redis client", e)
        })?;

        let conn = match tokio::time::timeout(operation_timeout, ConnectionManager::new(client))
            .await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                return Err(AppError::with_source(
                    ErrorKind::ProviderUnavailable,
                    format!("Failed to connect to Redis at '{masked_url}'"),
                    e,
                ));
            }
            Err(_) => {
                return Err(AppError::provider_unavailable("redis", &masked_url));
            }
        };

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            masked_url,
            operation_timeout,
        })
    }

    /// Get a mutable clone of the connection manager.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Connection URL with the password replaced by `****`.
    pub fn masked_url(&self) -> &str {
        &self.masked_url
    }

    /// Run one command under the configured operation timeout.
    pub async fn bounded<T>(
        &self,
        command: &'static str,
        fut: impl Future<Output = redis::RedisResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Redis {command} error: {e}"), e)
            }),
            Err(_) => {
                warn!(
                    command,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Redis command timed out"
                );
                Err(AppError::storage(format!(
                    "Redis {command} timed out after {} ms",
                    self.operation_timeout.as_millis()
                )))
            }
        }
    }
}

/// Mask password in Redis URL for safe logging.
pub fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos >= scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
