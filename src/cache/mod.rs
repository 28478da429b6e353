//! Cache module for storing serialized API responses
//!
//! This module defines the [`CacheStore`] abstraction used by the served
//! endpoint: a string key-value store whose entries carry an absolute expiry.
//! Three backends are provided: Redis for shared deployments, an in-process
//! moka cache, and JSON files on disk.

mod file;
mod memory;
mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::{RedisStore, DEFAULT_REDIS_URL};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading or writing the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis command or connection failed
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// Filesystem access failed
    #[error("Cache file error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored entry could not be encoded or decoded
    #[error("Cache entry is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string key-value store with absolute expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `None` when absent or expired
    async fn get_string(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, expiring `ttl` after this write
    async fn set_string(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Which [`CacheStore`] implementation to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
    File,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::Redis => "redis",
            CacheBackend::Memory => "memory",
            CacheBackend::File => "file",
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" | "mem" => Ok(CacheBackend::Memory),
            "file" | "disk" => Ok(CacheBackend::File),
            _ => Err(s.to_string()),
        }
    }
}
