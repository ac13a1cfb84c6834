//! Caching infrastructure for service discovery.
//!
//! This module provides the cache store abstraction consumed by the
//! caching supplier, with in-memory and Redis implementations. The store
//! owns its eviction and expiry policy; callers only get and put whole
//! snapshots.

pub mod cache_keys;
mod memory;
mod redis_cache;
mod store;

pub use memory::{InMemoryCacheStore, DEFAULT_CAPACITY};
pub use redis_cache::{RedisCacheStore, DEFAULT_TTL};
pub use store::{CacheStore, CacheStoreExt};

#[cfg(test)]
pub(crate) use store::MockCacheStore;
