//! Redis-based cache store.

use super::CacheStore;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, Runtime};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use vela_config::RedisConfig;
use vela_core::{VelaError, VelaResult};

/// Default TTL for cached snapshots (35 seconds).
pub const DEFAULT_TTL: Duration = Duration::from_secs(35);

/// Redis-based cache store.
pub struct RedisCacheStore {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
    /// TTL applied to every stored snapshot.
    ttl: Duration,
}

impl RedisCacheStore {
    /// Creates a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self {
            pool: Some(pool),
            ttl: DEFAULT_TTL,
        }
    }

    /// Creates a cache store with a custom TTL.
    #[must_use]
    pub fn with_ttl(pool: Arc<Pool>, ttl: Duration) -> Self {
        Self {
            pool: Some(pool),
            ttl,
        }
    }

    /// Creates a no-op cache store (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            ttl: DEFAULT_TTL,
        }
    }

    /// Builds a cache store from the Redis configuration.
    ///
    /// Returns the disabled store when Redis is not enabled.
    pub fn connect(config: &RedisConfig, ttl: Duration) -> VelaResult<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| VelaError::Cache(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| VelaError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self::with_ttl(Arc::new(pool), ttl))
    }

    /// Check if the store is backed by a live pool.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> VelaResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| VelaError::Cache(format!("Failed to get Redis connection: {}", e))),
            None => Err(VelaError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get_raw(&self, key: &str) -> VelaResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| VelaError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn put_raw(&self, key: &str, value: &str) -> VelaResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = self.ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| VelaError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }
}
