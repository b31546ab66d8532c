//! Application Configuration
//!
//! Configuration for the Store application layer.

use std::time::Duration;

/// Store application configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// TTL for the featured-products cache entry (1 hour)
    pub featured_cache_ttl: Duration,
    /// Cache key for the featured-products entry
    pub featured_cache_key: String,
    /// How many products the recommendation endpoint returns
    pub recommended_limit: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            featured_cache_ttl: Duration::from_secs(3600), // 1 hour
            featured_cache_key: "featured_products".to_string(),
            recommended_limit: 4,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
