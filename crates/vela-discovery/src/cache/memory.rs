//! In-memory cache store with per-entry expiry.

use super::CacheStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use vela_config::CacheConfig;
use vela_core::VelaResult;

/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: usize = 256;

/// An entry with its eviction deadline.
#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    deadline: Instant,
}

/// In-memory cache store for local development and single-process
/// deployments.
///
/// Entries expire after the configured time-to-live. When the store is at
/// capacity, expired entries are evicted first, then the entry closest to
/// expiry.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl InMemoryCacheStore {
    /// Creates a store with the given time-to-live and default capacity.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    /// Creates a store with the given time-to-live and capacity.
    #[must_use]
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Creates a store from the cache configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_capacity(config.ttl(), config.capacity)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get_raw(&self, key: &str) -> VelaResult<Option<String>> {
        let entries = self.entries.read().await;
        let value = entries
            .get(key)
            .filter(|entry| entry.deadline > Instant::now())
            .map(|entry| entry.value.clone());

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn put_raw(&self, key: &str, value: &str) -> VelaResult<()> {
        let mut entries = self.entries.write().await;

        if entries.len() >= self.capacity && !entries.contains_key(key) {
            let now = Instant::now();
            entries.retain(|_, entry| entry.deadline > now);

            if entries.len() >= self.capacity {
                let evict = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.deadline)
                    .map(|(key, _)| key.clone());
                if let Some(evict) = evict {
                    entries.remove(&evict);
                }
            }
        }

        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                deadline: Instant::now() + self.ttl,
            },
        );

        debug!("Cached key '{}' with TTL {}s", key, self.ttl.as_secs());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryCacheStore::new(Duration::from_secs(30));
        store.put_raw("k", "v").await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = InMemoryCacheStore::new(Duration::from_secs(30));
        assert_eq!(store.get_raw("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_previous_value() {
        let store = InMemoryCacheStore::new(Duration::from_secs(30));
        store.put_raw("k", "old").await.unwrap();
        store.put_raw("k", "new").await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_expired_entry_behaves_as_miss() {
        let store = InMemoryCacheStore::new(Duration::ZERO);
        store.put_raw("k", "v").await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_from_config() {
        let store = InMemoryCacheStore::from_config(&CacheConfig::default());
        assert_eq!(store.ttl, Duration::from_secs(35));
        assert_eq!(store.capacity, 256);
    }

    #[tokio::test]
    async fn test_capacity_eviction() {
        let store = InMemoryCacheStore::with_capacity(Duration::from_secs(30), 2);
        store.put_raw("a", "1").await.unwrap();
        store.put_raw("b", "2").await.unwrap();
        store.put_raw("c", "3").await.unwrap();

        let entries = store.entries.read().await;
        assert_eq!(entries.len(), 2);
        assert!(entries.contains_key("c"));
    }
}
