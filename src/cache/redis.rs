//! Redis-backed cache store
//!
//! Entries are plain Redis strings written with `SET key value PX ttl`, so
//! expiry is enforced by the server and every instance sharing the Redis
//! sees the same entry.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::{CacheError, CacheStore};

/// Connection target used when none is configured
pub const DEFAULT_REDIS_URL: &str = "redis://localhost";

/// Cache store backed by a Redis server
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis at `url`.
    ///
    /// The first connection is established eagerly, so an unreachable server
    /// fails here rather than on the first request.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        tracing::info!(url = %url, "Connected to Redis");
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_string(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let () = conn.pset_ex(key, value, expiry_millis(ttl)).await?;
        Ok(())
    }
}

/// TTL in milliseconds for `PX`, which rejects 0
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}
