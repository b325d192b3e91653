//! Response caching for filtered list endpoints.
//!
//! Keys are namespaced with a configurable prefix (and optionally hashed),
//! grouped per resource in an index, and evicted together when the resource
//! changes.
//!
//! ## Backends
//!
//! - **local**: in-process DashMap, for single instances and tests
//! - **redis**: shared across instances through a deadpool-redis pool
//!
//! A disabled config always yields a [`NoopCache`].

pub mod backend;
pub mod config;
pub mod error;
pub mod keys;
pub mod local;
pub mod redis_cache;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use backend::{Cache, CacheStats, CachedEntry, NoopCache};
pub use config::{CacheConfig, hash_key, until_next_midnight};
pub use error::CacheError;
pub use keys::{RouteKey, cache_key, route_key};
pub use local::LocalCache;
pub use redis_cache::RedisCache;

/// Supported cache backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Local,
    Redis,
}

impl FromStr for CacheKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "redis" => Ok(Self::Redis),
            _ => Err(CacheError::UnsupportedBackend(s.to_string())),
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Redis => f.write_str("redis"),
        }
    }
}

/// Create a cache for the named backend.
///
/// Unknown backend names fail with [`CacheError::UnsupportedBackend`]; Redis
/// connection failures are returned rather than degraded to a local cache.
pub async fn create_cache(kind: &str, config: CacheConfig) -> Result<Arc<dyn Cache>, CacheError> {
    let kind: CacheKind = kind.parse()?;

    if !config.enabled {
        tracing::info!(backend = %kind, "Caching disabled, using no-op cache");
        return Ok(Arc::new(NoopCache::new(config)));
    }

    let cache: Arc<dyn Cache> = match kind {
        CacheKind::Local => Arc::new(LocalCache::new(config)),
        CacheKind::Redis => Arc::new(RedisCache::connect(config).await?),
    };
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_kind_parse() {
        assert_eq!("redis".parse::<CacheKind>().unwrap(), CacheKind::Redis);
        assert_eq!(" Local ".parse::<CacheKind>().unwrap(), CacheKind::Local);
        assert!(matches!(
            "memcached".parse::<CacheKind>(),
            Err(CacheError::UnsupportedBackend(name)) if name == "memcached"
        ));
    }

    #[tokio::test]
    async fn test_create_cache_unknown_backend() {
        let result = create_cache("unknown", CacheConfig::default()).await;
        assert!(matches!(result, Err(CacheError::UnsupportedBackend(_))));
    }

    #[tokio::test]
    async fn test_create_cache_disabled_is_noop() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        // No Redis server is contacted when caching is disabled.
        let cache = create_cache("redis", config).await.unwrap();
        assert_eq!(cache.stats().mode, "disabled");
    }

    #[tokio::test]
    async fn test_create_local_cache() {
        let cache = create_cache("local", CacheConfig::with_prefix("tmp:test"))
            .await
            .unwrap();
        cache.set_key("hello", b"world", None).await.unwrap();
        assert!(cache.get("hello").await.unwrap().is_some());
        assert_eq!(cache.config().prefix, "tmp:test");
    }
}
