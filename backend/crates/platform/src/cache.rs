//! Cache Port
//!
//! An explicit, injected cache interface for read-mostly data (featured
//! products and the like). Components depend on the [`Cache`] trait, never
//! on a concrete tier: [`NoopCache`] satisfies the interface when no cache
//! tier exists, [`MemoryCache`] serves single-process deployments.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// String-keyed cache with per-entry TTL
#[trait_variant::make(Cache: Send)]
pub trait LocalCache {
    /// Get a value, if present and not expired
    async fn get(&self, key: &str) -> Option<String>;

    /// Set a value with a time-to-live
    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Delete a value
    async fn delete(&self, key: &str);
}

// ============================================================================
// No-op implementation
// ============================================================================

/// Cache that stores nothing: every get is a miss
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl Cache for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) {}

    async fn delete(&self, _key: &str) {}
}

// ============================================================================
// In-memory implementation
// ============================================================================

/// Process-local cache backed by a mutexed map
///
/// Expired entries are dropped lazily on read; there is no background
/// sweeper, which is fine for the handful of keys this backend caches.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), (value, Instant::now() + ttl));
    }

    async fn delete(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cache, Duration, MemoryCache, NoopCache};

    #[tokio::test]
    async fn test_noop_cache_always_misses() {
        let cache = NoopCache;
        cache
            .set("key", "value".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("key").await, None);
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        cache
            .set("key", "value".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("key").await, Some("value".to_string()));

        cache.delete("key").await;
        assert_eq!(cache.get("key").await, None);
    }

    #[tokio::test]
    async fn test_memory_cache_expiry() {
        let cache = MemoryCache::new();
        cache
            .set("key", "value".to_string(), Duration::from_millis(10))
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get("key").await, None);
    }
}
