//! Service instances and instance-list snapshots.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One reachable endpoint backing a logical service.
///
/// The discovery layers forward and store instances as atomic units; only
/// the load-balancing layer above inspects their contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Registry-assigned identifier of this instance, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Hostname or address of the instance.
    pub host: String,
    /// Port the instance listens on.
    pub port: u16,
    /// Whether the instance expects TLS.
    #[serde(default)]
    pub secure: bool,
    /// Registry metadata attached to the instance.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ServiceInstance {
    /// Creates a plain (non-TLS) instance.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            instance_id: None,
            host: host.into(),
            port,
            secure: false,
            metadata: HashMap::new(),
        }
    }

    /// Sets the registry-assigned instance id.
    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// Marks the instance as expecting TLS.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Attaches a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the URI of this instance.
    #[must_use]
    pub fn uri(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// An ordered, immutable list of instances valid as of one fetch.
///
/// A snapshot is produced whole and replaced whole; an empty snapshot is
/// forwarded to callers but is never a usable cache value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceSnapshot(Vec<ServiceInstance>);

impl InstanceSnapshot {
    /// Creates a snapshot from a list of instances.
    #[must_use]
    pub fn new(instances: Vec<ServiceInstance>) -> Self {
        Self(instances)
    }

    /// Creates an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns true when the snapshot holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of instances in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the instances in emission order.
    #[must_use]
    pub fn instances(&self) -> &[ServiceInstance] {
        &self.0
    }
}

impl From<Vec<ServiceInstance>> for InstanceSnapshot {
    fn from(instances: Vec<ServiceInstance>) -> Self {
        Self(instances)
    }
}

impl IntoIterator for InstanceSnapshot {
    type Item = ServiceInstance;
    type IntoIter = std::vec::IntoIter<ServiceInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_uri() {
        let instance = ServiceInstance::new("10.0.0.1", 8080);
        assert_eq!(instance.uri(), "http://10.0.0.1:8080");

        let secure = ServiceInstance::new("10.0.0.1", 8443).with_secure(true);
        assert_eq!(secure.uri(), "https://10.0.0.1:8443");
    }

    #[test]
    fn test_instance_builders() {
        let instance = ServiceInstance::new("10.0.0.1", 8080)
            .with_instance_id("orders-1")
            .with_metadata("zone", "eu-west-1");
        assert_eq!(instance.instance_id.as_deref(), Some("orders-1"));
        assert_eq!(instance.metadata.get("zone").map(String::as_str), Some("eu-west-1"));
    }

    #[test]
    fn test_snapshot_emptiness() {
        assert!(InstanceSnapshot::empty().is_empty());
        assert_eq!(InstanceSnapshot::empty().len(), 0);

        let snapshot = InstanceSnapshot::new(vec![ServiceInstance::new("10.0.0.1", 8080)]);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let a = ServiceInstance::new("10.0.0.1", 8080);
        let b = ServiceInstance::new("10.0.0.2", 8080);
        let snapshot = InstanceSnapshot::new(vec![a.clone(), b.clone()]);
        assert_eq!(snapshot.instances(), &[a, b]);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = InstanceSnapshot::new(vec![
            ServiceInstance::new("10.0.0.1", 8080).with_instance_id("orders-1"),
        ]);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: InstanceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
