//! File-backed cache store
//!
//! Stores each entry as a JSON file holding the value and its expiry
//! timestamp. Expired entries read as absent and are removed on read.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::{CacheError, CacheStore};

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// The cached value
    value: String,
    /// When the value was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Cache store writing one JSON file per key
///
/// Files live in an XDG-compliant cache directory (`~/.cache/tikicrawl/` on
/// Linux) unless a directory is given explicitly.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "tikicrawl")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a FileStore with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.cache_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Discarding unreadable cache file"
                );
                return Ok(None);
            }
        };

        if Utc::now() >= entry.expires_at {
            tracing::debug!(key = %key, expired_at = %entry.expires_at, "Cache file expired");
            if let Err(e) = fs::remove_file(&path).await {
                tracing::debug!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove expired cache file"
                );
            }
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    async fn set_string(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).await?;

        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry {
            value: value.to_string(),
            cached_at: now,
            expires_at,
        };

        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.cache_path(key), json).await?;
        Ok(())
    }
}
