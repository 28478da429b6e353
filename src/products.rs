//! Cache-aside product lookup
//!
//! Serves the product listing from the cache when a fresh entry exists and
//! falls back to the Tiki API otherwise, writing the fresh listing back with
//! an absolute expiry.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cache::{CacheError, CacheStore};
use crate::data::{ApiResponse, Product, ProductQuery, TikiClient};

/// Key the serialized listing is stored under
pub const PRODUCTS_CACHE_KEY: &str = "ProductsCache";

/// How long a cached listing stays valid
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Errors that can occur while serving the listing
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to serialize products: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Where a listing was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Upstream,
}

/// A product listing and its origin
#[derive(Debug, Clone)]
pub struct Products {
    pub items: Vec<Product>,
    pub source: Source,
}

/// Product listing with a cache in front of the Tiki API
///
/// Concurrent misses are not coalesced: each one calls upstream and writes
/// the key, and the last write wins.
#[derive(Clone)]
pub struct ProductService {
    client: TikiClient,
    cache: Arc<dyn CacheStore>,
    query: ProductQuery,
    cache_key: String,
    ttl: Duration,
}

impl ProductService {
    pub fn new(client: TikiClient, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            client,
            cache,
            query: ProductQuery::default(),
            cache_key: PRODUCTS_CACHE_KEY.to_string(),
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override how long written entries stay valid
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the upstream search
    pub fn with_query(mut self, query: ProductQuery) -> Self {
        self.query = query;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the listing from cache, or from upstream on a miss
    ///
    /// # Behavior
    /// - A present, non-empty entry that decodes is a hit
    /// - An entry that fails to decode is logged and treated as a miss
    /// - On a miss the full upstream response is cached, even when empty
    pub async fn get_products(&self) -> Result<Products, ServiceError> {
        if let Some(items) = self.read_cached().await? {
            tracing::info!(key = %self.cache_key, count = items.len(), "Returning data from cache");
            return Ok(Products {
                items,
                source: Source::Cache,
            });
        }

        let response = self.client.fetch_products(&self.query).await;

        let serialized = serde_json::to_string(&response)?;
        self.cache
            .set_string(&self.cache_key, &serialized, self.ttl)
            .await?;

        tracing::info!(
            key = %self.cache_key,
            count = response.data.len(),
            ttl_secs = self.ttl.as_secs(),
            "Returning from tiki.vn"
        );
        Ok(Products {
            items: response.data,
            source: Source::Upstream,
        })
    }

    async fn read_cached(&self) -> Result<Option<Vec<Product>>, ServiceError> {
        let cached = match self.cache.get_string(&self.cache_key).await? {
            Some(cached) if !cached.is_empty() => cached,
            _ => {
                tracing::debug!(key = %self.cache_key, "Cache MISS");
                return Ok(None);
            }
        };

        match ApiResponse::from_json(&cached) {
            Ok(response) => Ok(Some(response.data)),
            Err(e) => {
                tracing::warn!(
                    key = %self.cache_key,
                    error = %e,
                    "Ignoring undecodable cache entry"
                );
                Ok(None)
            }
        }
    }
}
