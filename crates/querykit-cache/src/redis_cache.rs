//! Redis cache backend.

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{Cache, CacheStats};
use crate::config::CacheConfig;
use crate::error::CacheError;

/// Cache shared across instances through Redis.
///
/// Indexes are Redis sets; deleting an index removes its members and the set
/// in a single `DEL`.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
    config: CacheConfig,
}

impl RedisCache {
    /// Wrap an existing pool.
    pub fn new(pool: Pool, config: CacheConfig) -> Self {
        Self { pool, config }
    }

    /// Create a pool for `config.addr` and check the connection with `PING`.
    pub async fn connect(config: CacheConfig) -> Result<Self, CacheError> {
        let url = config.redis_url();
        tracing::info!(addr = %config.addr, "Connecting to Redis");

        let timeout = Duration::from_millis(config.timeout_ms);
        let mut redis_config = deadpool_redis::Config::from_url(url);
        let pool_config = redis_config
            .pool
            .get_or_insert_with(|| deadpool_redis::PoolConfig::new(config.pool_size));
        pool_config.max_size = config.pool_size;
        pool_config.timeouts.wait = Some(timeout);
        pool_config.timeouts.create = Some(timeout);
        pool_config.timeouts.recycle = Some(timeout);

        let pool = redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1))?;

        let mut conn = pool.get().await.map_err(|e| {
            tracing::error!(addr = %config.addr, error = %e, "Failed to open cache connection");
            CacheError::connection(&config.addr, &e)
        })?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        tracing::info!(addr = %config.addr, "Connected to Redis");
        Ok(Self::new(pool, config))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl Cache for RedisCache {
    async fn set_key(
        &self,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let ttl = self.config.effective_ttl(ttl);
        let key = self.config.cache_key(key);

        let mut conn = self.pool.get().await?;
        conn.pset_ex::<_, _, ()>(&key, value, ttl_millis(ttl)).await?;
        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set (redis)");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, CacheError> {
        let key = self.config.cache_key(key);

        let mut conn = self.pool.get().await?;
        let value: Option<Vec<u8>> = conn.get(&key).await?;
        match &value {
            Some(_) => tracing::debug!(key = %key, "cache hit (redis)"),
            None => tracing::debug!(key = %key, "cache miss (redis)"),
        }
        Ok(value.map(Arc::new))
    }

    async fn set_key_index(&self, index: &str, member: &str) -> Result<(), CacheError> {
        let index = self.config.index_key(index);
        let member = self.config.cache_key(member);

        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&index, &member).await.map_err(|e| {
            tracing::warn!(index = %index, error = %e, "Failed to add member to index");
            CacheError::from(e)
        })?;
        Ok(())
    }

    async fn delete_cache_index(&self, index: &str) -> Result<usize, CacheError> {
        let index = self.config.index_key(index);

        let mut conn = self.pool.get().await?;
        let mut keys: Vec<String> = conn.smembers(&index).await?;
        keys.push(index.clone());

        let removed: usize = conn.del(&keys).await?;
        tracing::debug!(index = %index, removed, "cache index deleted (redis)");
        Ok(removed)
    }

    async fn delete(&self, keys: &[&str]) -> Result<usize, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let keys: Vec<String> = keys.iter().map(|k| self.config.cache_key(k)).collect();

        let mut conn = self.pool.get().await?;
        let removed: usize = conn.del(&keys).await?;
        Ok(removed)
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64, CacheError> {
        let key = self.config.cache_key(key);

        let mut conn = self.pool.get().await?;
        let exists: bool = conn.exists(&key).await?;
        if !exists {
            conn.pset_ex::<_, _, ()>(&key, 1, ttl_millis(ttl)).await?;
            return Ok(1);
        }
        let value: i64 = conn.incr(&key, 1).await?;
        Ok(value)
    }

    fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            mode: "redis",
            ..CacheStats::default()
        }
    }
}
