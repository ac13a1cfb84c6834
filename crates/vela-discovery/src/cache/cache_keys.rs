//! Cache key generation for the service instance cache.

use vela_core::ServiceId;

/// Name of the service instance cache region.
///
/// TODO: make the region name configurable instead of deriving it from the
/// caching supplier's name.
pub const SERVICE_INSTANCE_CACHE_NAME: &str = "CachingServiceInstanceSupplierCache";

/// Generate the cache key holding the instance snapshot for a service.
#[must_use]
pub fn service_instances(service_id: &ServiceId) -> String {
    format!("{}:{}", SERVICE_INSTANCE_CACHE_NAME, service_id)
}
