//! Supplier over a fixed list of instances.

use crate::supplier::{InstanceStream, ServiceInstanceSupplier};
use futures::stream::{self, StreamExt};
use vela_core::{InstanceSnapshot, ServiceId, ServiceInstance};

/// A [`ServiceInstanceSupplier`] that emits one fixed snapshot.
///
/// Useful for static wiring and as a delegate in tests; every `get()`
/// emits the configured snapshot once and completes.
#[derive(Debug, Clone)]
pub struct FixedServiceInstanceSupplier {
    service_id: ServiceId,
    snapshot: InstanceSnapshot,
}

impl FixedServiceInstanceSupplier {
    /// Creates a supplier over a fixed snapshot.
    #[must_use]
    pub fn new(service_id: impl Into<ServiceId>, snapshot: InstanceSnapshot) -> Self {
        Self {
            service_id: service_id.into(),
            snapshot,
        }
    }

    /// Creates a supplier over a fixed list of instances.
    #[must_use]
    pub fn with_instances(
        service_id: impl Into<ServiceId>,
        instances: Vec<ServiceInstance>,
    ) -> Self {
        Self::new(service_id, InstanceSnapshot::new(instances))
    }
}

impl ServiceInstanceSupplier for FixedServiceInstanceSupplier {
    fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    fn get(&self) -> InstanceStream {
        stream::iter([Ok(self.snapshot.clone())]).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_emits_snapshot_once() {
        let supplier = FixedServiceInstanceSupplier::with_instances(
            "orders",
            vec![ServiceInstance::new("10.0.0.1", 8080)],
        );

        let emitted: Vec<_> = supplier.get().collect().await;
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_service_id() {
        let supplier =
            FixedServiceInstanceSupplier::new("orders", InstanceSnapshot::empty());
        assert_eq!(supplier.service_id().as_str(), "orders");
    }
}
