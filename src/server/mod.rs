//! HTTP surface for the cached product listing.
//!
//! # Endpoints
//!
//! - `GET /CrawlerData/Craw` - Product listing (cache-aside, 60 s expiry)
//! - `GET /health` - Health check

mod error;
mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::{HealthResponse, CACHE_STATUS_HEADER};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::cache::{CacheBackend, CacheError, CacheStore, FileStore, MemoryStore, RedisStore};
use crate::config::Config;
use crate::data::TikiClient;
use crate::products::ProductService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
}

impl AppState {
    pub fn new(products: ProductService) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// Builds the state described by `config`, opening the cache backend.
    ///
    /// Fails when the Redis backend is selected and the server is unreachable.
    pub async fn from_config(config: &Config) -> Result<Self, CacheError> {
        let store = open_store(config).await?;
        let client = TikiClient::new().with_base_url(config.tiki_base_url.clone());
        let products = ProductService::new(client, store)
            .with_ttl(config.cache_ttl)
            .with_query(config.query.clone());
        Ok(Self::new(products))
    }
}

async fn open_store(config: &Config) -> Result<Arc<dyn CacheStore>, CacheError> {
    tracing::info!(backend = %config.cache_backend, "Opening cache");
    let store: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
        CacheBackend::File => {
            let store = match &config.cache_dir {
                Some(dir) => FileStore::with_dir(dir.clone()),
                None => FileStore::new().ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no cache directory available, set CACHE_DIR",
                    )
                })?,
            };
            tracing::debug!(dir = %store.cache_dir().display(), "Using file cache");
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Builds the router with all endpoints and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/CrawlerData/Craw", get(routes::craw))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `port` on all interfaces and serves until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(state)).await
}
