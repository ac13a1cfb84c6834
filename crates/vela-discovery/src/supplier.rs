//! Service instance supplier contract.

use futures::stream::BoxStream;
use vela_core::{InstanceSnapshot, ServiceId, VelaResult};

/// A stream of instance-list snapshots for one service.
///
/// A supplier may emit zero or more snapshots over time before completing;
/// an `Err` item terminates the stream.
pub type InstanceStream = BoxStream<'static, VelaResult<InstanceSnapshot>>;

/// Produces the list of instances currently backing a logical service.
///
/// Implementations range from registry-backed lookups to fixed lists and
/// decorators such as [`crate::CachingServiceInstanceSupplier`].
pub trait ServiceInstanceSupplier: Send + Sync {
    /// Returns the id of the service this supplier resolves.
    fn service_id(&self) -> &ServiceId;

    /// Returns a stream of instance-list snapshots for the service.
    fn get(&self) -> InstanceStream;
}
