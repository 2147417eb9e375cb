use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-memory snapshot cache for the two input collections.
///
/// The matching engine must run against an immutable snapshot, so the route
/// layer loads a full collection once, parks it here with a TTL, and hands
/// clones of the snapshot to the engine. This replaces the module-global
/// collection map the legacy sync layer used: the cache is owned by the app
/// state and has an explicit load/flush lifecycle.
pub struct SnapshotCache {
    cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl SnapshotCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache, ttl_secs }
    }

    /// Get a snapshot from the cache
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.cache.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Store a snapshot (expires after the configured TTL)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.cache.insert(key.to_string(), bytes).await;
        tracing::trace!("Cache set: {} (ttl: {}s)", key, self.ttl_secs);
        Ok(())
    }

    /// Drop a snapshot before its TTL expires
    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop every cached snapshot
    pub fn flush(&self) {
        self.cache.invalidate_all();
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the full contact collection snapshot
    pub fn contacts() -> String {
        "snapshot:contacts".to_string()
    }

    /// Key for the full property collection snapshot
    pub fn properties() -> String {
        "snapshot:properties".to_string()
    }
}
