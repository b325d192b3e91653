//! In-process cache backend.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::backend::{Cache, CacheStats, CachedEntry};
use crate::config::CacheConfig;
use crate::error::CacheError;

/// Single-instance cache backed by DashMap.
///
/// Entries expire lazily on read; [`cleanup_expired`](Self::cleanup_expired)
/// sweeps the rest. Indexes are plain sets of namespaced keys.
pub struct LocalCache {
    config: CacheConfig,
    entries: DashMap<String, CachedEntry>,
    indexes: DashMap<String, HashSet<String>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl LocalCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
            indexes: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Remove expired entries. Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if entry.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    fn remove_live(&self, key: &str) -> bool {
        self.entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired())
    }
}

#[async_trait]
impl Cache for LocalCache {
    async fn set_key(
        &self,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let ttl = self.config.effective_ttl(ttl);
        let key = self.config.cache_key(key);
        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set (local)");
        self.entries.insert(key, CachedEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, CacheError> {
        let key = self.config.cache_key(key);

        if let Some(entry) = self.entries.get(&key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "cache hit (local)");
                return Ok(Some(Arc::clone(&entry.data)));
            }
            drop(entry);
            self.entries.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, "cache miss (local)");
        Ok(None)
    }

    async fn set_key_index(&self, index: &str, member: &str) -> Result<(), CacheError> {
        let index = self.config.index_key(index);
        let member = self.config.cache_key(member);
        self.indexes.entry(index).or_default().insert(member);
        Ok(())
    }

    async fn delete_cache_index(&self, index: &str) -> Result<usize, CacheError> {
        let index = self.config.index_key(index);
        let Some((_, members)) = self.indexes.remove(&index) else {
            return Ok(0);
        };

        // The index itself counts as a removed key.
        let removed = 1 + members.iter().filter(|m| self.remove_live(m)).count();
        tracing::debug!(index = %index, removed, "cache index deleted (local)");
        Ok(removed)
    }

    async fn delete(&self, keys: &[&str]) -> Result<usize, CacheError> {
        let removed = keys
            .iter()
            .map(|key| self.config.cache_key(key))
            .filter(|key| self.remove_live(key))
            .count();
        Ok(removed)
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64, CacheError> {
        let key = self.config.cache_key(key);
        let mut entry = self
            .entries
            .entry(key)
            .or_insert_with(|| CachedEntry::new(b"0".to_vec(), ttl));

        let current = if entry.is_expired() {
            *entry = CachedEntry::new(b"0".to_vec(), ttl);
            0
        } else {
            std::str::from_utf8(&entry.data)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(0)
        };

        let next = current + 1;
        entry.data = Arc::new(next.to_string().into_bytes());
        Ok(next)
    }

    fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            mode: "local",
            size: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
