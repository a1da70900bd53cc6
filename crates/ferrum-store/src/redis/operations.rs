//! Redis key-value backend implementation.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use ferrum_core::result::AppResult;
use ferrum_core::traits::kv::KeyValueStore;

use super::client::RedisClient;

/// Redis-backed [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct RedisKeyValueStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisKeyValueStore {
    /// Create a new Redis key-value store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.conn_mut();
        self.client.bounded("GET", conn.get(key)).await
    }

    async fn mget(&self, keys: &[String]) -> AppResult<Vec<Option<String>>> {
        // MGET without arguments is a protocol error.
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.client.conn_mut();
        let mut cmd = redis::cmd("MGET");
        cmd.arg(keys);
        self.client
            .bounded("MGET", cmd.query_async::<Vec<Option<String>>>(&mut conn))
            .await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        self.client
            .bounded("SET", conn.set::<_, _, ()>(key, value))
            .await
    }

    async fn delete(&self, key: &str) -> AppResult<u64> {
        let mut conn = self.client.conn_mut();
        let removed: u64 = self.client.bounded("DEL", conn.del(key)).await?;
        debug!(key, removed, "Deleted key");
        Ok(removed)
    }

    async fn rpush(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: i64 = self.client.bounded("RPUSH", conn.rpush(key, value)).await?;
        Ok(())
    }

    async fn lrange(&self, key: &str) -> AppResult<Vec<String>> {
        let mut conn = self.client.conn_mut();
        self.client.bounded("LRANGE", conn.lrange(key, 0, -1)).await
    }

    async fn ping(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = self
            .client
            .bounded("PING", redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(pong == "PONG")
    }

    fn describe(&self) -> (&'static str, String) {
        ("redis", self.client.masked_url().to_string())
    }
}
