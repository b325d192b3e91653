//! Cache configuration.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use time::OffsetDateTime;

/// Cache configuration shared by every backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Backend address, e.g. `127.0.0.1:6379` or `redis://cache:6379`
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Disabled caches accept writes and never return hits
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Namespace prepended to every key, e.g. `myproject:api`
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Replace namespaced keys with their SHA-256 digest
    #[serde(default)]
    pub hash_keys: bool,

    /// TTL for keys set without one. Unset means "until next midnight (UTC)".
    #[serde(default, with = "humantime_serde")]
    pub default_expiration: Option<Duration>,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_addr() -> String {
    "127.0.0.1:6379".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_prefix() -> String {
    "default".to_string()
}

fn default_pool_size() -> usize {
    10
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            enabled: default_enabled(),
            prefix: default_prefix(),
            hash_keys: false,
            default_expiration: None,
            pool_size: default_pool_size(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CacheConfig {
    /// Config with the given namespace and defaults for everything else.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Namespace `key` with the prefix, hashing the result when configured.
    pub fn cache_key(&self, key: &str) -> String {
        let key = format!("{}:{key}", self.prefix);
        if self.hash_keys { hash_key(&key) } else { key }
    }

    /// Storage key of the set holding the members of `index`.
    pub fn index_key(&self, index: &str) -> String {
        self.cache_key(&format!("{index}:keys"))
    }

    /// TTL to apply: the explicit one, else the configured default, else the
    /// time left until next midnight.
    pub fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        ttl.or(self.default_expiration)
            .unwrap_or_else(until_next_midnight)
    }

    /// Redis connection URL for `addr`, adding the scheme when missing.
    pub fn redis_url(&self) -> String {
        if self.addr.contains("://") {
            self.addr.clone()
        } else {
            format!("redis://{}", self.addr)
        }
    }
}

/// Hex-encoded SHA-256 digest of `key`.
pub fn hash_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Time left until the next UTC midnight.
pub fn until_next_midnight() -> Duration {
    let now = OffsetDateTime::now_utc();
    match now.date().next_day() {
        Some(tomorrow) => (tomorrow.midnight().assume_utc() - now).unsigned_abs(),
        None => Duration::from_secs(24 * 60 * 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.addr, "127.0.0.1:6379");
        assert!(config.enabled);
        assert_eq!(config.prefix, "default");
        assert!(!config.hash_keys);
        assert!(config.default_expiration.is_none());
    }

    #[test]
    fn test_cache_key_prefix_and_hash() {
        let mut config = CacheConfig::with_prefix("shop:api");
        assert_eq!(config.cache_key("cars:1"), "shop:api:cars:1");
        assert_eq!(config.index_key("cars:1"), "shop:api:cars:1:keys");

        config.hash_keys = true;
        let hashed = config.cache_key("cars:1");
        assert_eq!(hashed.len(), 64);
        assert_eq!(hashed, hash_key("shop:api:cars:1"));
        assert!(hashed.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_key_known_digest() {
        assert_eq!(
            hash_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_effective_ttl_precedence() {
        let mut config = CacheConfig::default();
        let explicit = Duration::from_secs(5);
        assert_eq!(config.effective_ttl(Some(explicit)), explicit);

        let fallback = config.effective_ttl(None);
        assert!(fallback > Duration::ZERO);
        assert!(fallback <= Duration::from_secs(24 * 60 * 60));

        config.default_expiration = Some(Duration::from_secs(90));
        assert_eq!(config.effective_ttl(None), Duration::from_secs(90));
    }

    #[test]
    fn test_redis_url() {
        let mut config = CacheConfig::default();
        assert_eq!(config.redis_url(), "redis://127.0.0.1:6379");
        config.addr = "rediss://cache:6380".into();
        assert_eq!(config.redis_url(), "rediss://cache:6380");
    }

    #[test]
    fn test_deserialize_humantime_expiration() {
        let config: CacheConfig = serde_json::from_value(serde_json::json!({
            "prefix": "tmp",
            "default_expiration": "1h 30m"
        }))
        .unwrap();
        assert_eq!(config.prefix, "tmp");
        assert_eq!(config.default_expiration, Some(Duration::from_secs(5400)));
        assert_eq!(config.pool_size, 10);
    }
}
