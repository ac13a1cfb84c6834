//! Cache store trait for abstracted caching operations.

use async_trait::async_trait;
use vela_core::VelaResult;

/// Key/value store holding the most recent known-good snapshot per key.
///
/// This trait provides an abstraction over caching implementations,
/// allowing for easy swapping between Redis, in-memory, or other cache
/// backends. A `put` is always a total overwrite of the previous value.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> VelaResult<Option<String>>;

    /// Put a raw JSON value into the cache, replacing any previous value.
    async fn put_raw(&self, key: &str, value: &str) -> VelaResult<()>;
}

/// Extension trait with typed methods for convenience.
///
/// This trait provides generic get/put methods that work with any
/// serializable type.
#[async_trait]
pub trait CacheStoreExt: CacheStore {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> VelaResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Put a typed value into the cache.
    async fn put<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> VelaResult<()> {
        let json = serde_json::to_string(value)?;
        self.put_raw(key, &json).await
    }
}

// Blanket implementation for all CacheStore implementations
impl<T: CacheStore + ?Sized> CacheStoreExt for T {}
