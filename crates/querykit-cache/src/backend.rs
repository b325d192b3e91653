//! Cache abstraction shared by all backends.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;
use crate::error::CacheError;

/// Operations a cache backend must provide.
///
/// Keys passed in are logical keys; backends namespace them with
/// [`CacheConfig::cache_key`] before storing.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store `value` under `key`. Without a TTL the config's default
    /// expiration applies.
    async fn set_key(&self, key: &str, value: &[u8], ttl: Option<Duration>)
    -> Result<(), CacheError>;

    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, CacheError>;

    /// Record `member` in the index `index`.
    async fn set_key_index(&self, index: &str, member: &str) -> Result<(), CacheError>;

    /// Delete every key recorded in `index` and the index itself.
    /// Returns the number of keys removed.
    async fn delete_cache_index(&self, index: &str) -> Result<usize, CacheError>;

    /// Delete the given keys, returning how many existed.
    async fn delete(&self, keys: &[&str]) -> Result<usize, CacheError>;

    /// Increment the counter under `key`, creating it at 1 with `ttl` when
    /// absent. Returns the new value.
    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64, CacheError>;

    fn config(&self) -> &CacheConfig;

    /// Get cache statistics for monitoring.
    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub mode: &'static str,
    /// Number of entries currently held locally.
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    /// Number of entries evicted due to TTL expiration.
    pub evictions: u64,
}

/// A cached entry with TTL support.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Cache used when caching is disabled: writes are dropped, reads miss.
#[derive(Debug, Clone, Default)]
pub struct NoopCache {
    config: CacheConfig,
}

impl NoopCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Cache for NoopCache {
    async fn set_key(
        &self,
        _key: &str,
        _value: &[u8],
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<Arc<Vec<u8>>>, CacheError> {
        Ok(None)
    }

    async fn set_key_index(&self, _index: &str, _member: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete_cache_index(&self, _index: &str) -> Result<usize, CacheError> {
        Ok(0)
    }

    async fn delete(&self, _keys: &[&str]) -> Result<usize, CacheError> {
        Ok(0)
    }

    async fn increment(&self, _key: &str, _ttl: Duration) -> Result<i64, CacheError> {
        Ok(0)
    }

    fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            mode: "disabled",
            ..CacheStats::default()
        }
    }
}
