//! Cache-aside decoration of a service instance supplier.
//!
//! The caching supplier consults a [`CacheStore`] before its delegate: a
//! usable cached snapshot is replayed directly, while a miss subscribes to
//! the delegate once per request wave and writes every usable snapshot
//! back under the service's key. Store failures degrade to misses and
//! skipped writes; they are never visible to callers.

mod population;

use std::sync::{Arc, Weak};

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tracing::{debug, error};
use vela_core::{InstanceSnapshot, ServiceId, VelaError, VelaResult};

use crate::cache::{cache_keys, CacheStore, CacheStoreExt};
use crate::supplier::{InstanceStream, ServiceInstanceSupplier};

use population::Population;

/// A [`ServiceInstanceSupplier`] that serves instance snapshots from a
/// cache store, delegating to the wrapped supplier on a miss.
#[derive(Clone)]
pub struct CachingServiceInstanceSupplier {
    delegate: Arc<dyn ServiceInstanceSupplier>,
    cache_store: Arc<dyn CacheStore>,
    inflight: Arc<Mutex<Weak<Population>>>,
}

impl CachingServiceInstanceSupplier {
    /// Creates a caching supplier over the given delegate and cache store.
    #[must_use]
    pub fn new(
        delegate: Arc<dyn ServiceInstanceSupplier>,
        cache_store: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            delegate,
            cache_store,
            inflight: Arc::new(Mutex::new(Weak::new())),
        }
    }

    /// Returns a builder for assembling a caching supplier.
    #[must_use]
    pub fn builder() -> CachingServiceInstanceSupplierBuilder {
        CachingServiceInstanceSupplierBuilder::default()
    }

    /// Resolves one lookup: a cached snapshot, or attachment to the shared
    /// population for this supplier.
    async fn lookup(self) -> InstanceStream {
        let key = cache_keys::service_instances(self.delegate.service_id());

        match self.cache_store.get::<InstanceSnapshot>(&key).await {
            Ok(Some(snapshot)) if !snapshot.is_empty() => {
                debug!("Cache hit for '{}'", key);
                return stream::iter([Ok(snapshot)]).boxed();
            }
            Ok(_) => debug!("Cache miss for '{}'", key),
            Err(e) => error!(
                "Unable to read cache entry '{}', treating as miss: {}",
                key, e
            ),
        }

        self.join_population(key)
    }

    /// Attaches to the in-flight population for this supplier, starting
    /// one when none is active.
    fn join_population(&self, key: String) -> InstanceStream {
        let mut inflight = self.inflight.lock();
        if let Some(population) = inflight.upgrade().filter(|p| p.is_active()) {
            debug!("Joining in-flight cache population for '{}'", key);
            return population.attach();
        }

        debug!("Starting cache population for '{}'", key);
        let population = Population::spawn(
            Arc::clone(&self.delegate),
            Arc::clone(&self.cache_store),
            key,
        );
        *inflight = Arc::downgrade(&population);
        population.attach()
    }
}

impl ServiceInstanceSupplier for CachingServiceInstanceSupplier {
    fn service_id(&self) -> &ServiceId {
        self.delegate.service_id()
    }

    fn get(&self) -> InstanceStream {
        let this = self.clone();
        stream::once(async move { this.lookup().await })
            .flatten()
            .boxed()
    }
}

impl std::fmt::Debug for CachingServiceInstanceSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingServiceInstanceSupplier")
            .field("service_id", self.delegate.service_id())
            .finish_non_exhaustive()
    }
}

/// Builder for [`CachingServiceInstanceSupplier`].
///
/// Both the delegate and the cache store are mandatory; [`Self::build`]
/// reports which one is missing.
#[derive(Default)]
pub struct CachingServiceInstanceSupplierBuilder {
    delegate: Option<Arc<dyn ServiceInstanceSupplier>>,
    cache_store: Option<Arc<dyn CacheStore>>,
}

impl CachingServiceInstanceSupplierBuilder {
    /// Sets the delegate supplier consulted on a cache miss.
    #[must_use]
    pub fn delegate(mut self, delegate: Arc<dyn ServiceInstanceSupplier>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Sets the cache store consulted before the delegate.
    #[must_use]
    pub fn cache_store(mut self, cache_store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(cache_store);
        self
    }

    /// Builds the supplier, failing when a mandatory dependency is missing.
    pub fn build(self) -> VelaResult<CachingServiceInstanceSupplier> {
        let delegate = self.delegate.ok_or_else(|| {
            VelaError::configuration("delegate is required for CachingServiceInstanceSupplier")
        })?;
        let cache_store = self.cache_store.ok_or_else(|| {
            VelaError::configuration("cache store is required for CachingServiceInstanceSupplier")
        })?;
        Ok(CachingServiceInstanceSupplier::new(delegate, cache_store))
    }
}
