//! Runtime configuration loaded from environment variables.
//!
//! Every setting has a default, so an empty environment runs against the
//! public Tiki API with a local Redis and a one-minute cache.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{CacheBackend, DEFAULT_REDIS_URL};
use crate::data::tiki::DEFAULT_BASE_URL;
use crate::data::ProductQuery;
use crate::products::DEFAULT_CACHE_TTL;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port the server listens on.
    pub port: u16,
    /// Redis connection target.
    pub redis_url: String,
    /// Cache implementation used by the server.
    pub cache_backend: CacheBackend,
    /// Absolute expiry of the cached listing.
    pub cache_ttl: Duration,
    /// Directory for the file cache; `None` uses the XDG cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Upstream base address.
    pub tiki_base_url: String,
    /// Search sent upstream by both `fetch` and `serve`.
    pub query: ProductQuery,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let default_query = ProductQuery::default();

        Self {
            port: parsed("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
            redis_url: parsed("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            cache_backend: parsed("CACHE_BACKEND")
                .and_then(|v| match v.parse::<CacheBackend>() {
                    Ok(backend) => Some(backend),
                    Err(bad) => {
                        tracing::warn!(value = %bad, "Unknown CACHE_BACKEND, using default");
                        None
                    }
                })
                .unwrap_or_default(),
            cache_ttl: parsed("CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_TTL),
            cache_dir: parsed("CACHE_DIR").map(PathBuf::from),
            tiki_base_url: parsed("TIKI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            query: ProductQuery {
                q: parsed("TIKI_QUERY").unwrap_or(default_query.q),
                limit: parsed("TIKI_LIMIT")
                    .and_then(|v| v.parse().ok())
                    .filter(|limit| *limit > 0)
                    .unwrap_or(default_query.limit),
            },
        }
    }
}
