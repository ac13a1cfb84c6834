//! Shared cache-population execution.
//!
//! A population is one logical delegate subscription servicing every
//! caller that missed the cache while it is in flight. Signals are
//! materialized as they arrive, so a caller attaching mid-flight replays
//! the sequence so far before observing live emissions.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::mpsc;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use vela_core::{InstanceSnapshot, VelaResult};

use crate::cache::{CacheStore, CacheStoreExt};
use crate::supplier::{InstanceStream, ServiceInstanceSupplier};

type Signal = VelaResult<InstanceSnapshot>;

/// Materialized signals plus the listeners awaiting live ones.
struct ListenerTable {
    replay: Vec<Signal>,
    listeners: Vec<mpsc::UnboundedSender<Signal>>,
    done: bool,
}

impl ListenerTable {
    fn new() -> Self {
        Self {
            replay: Vec::new(),
            listeners: Vec::new(),
            done: false,
        }
    }

    /// Fans a signal out to every live listener and materializes it.
    fn publish(&mut self, signal: Signal) {
        self.listeners
            .retain(|tx| tx.unbounded_send(signal.clone()).is_ok());
        self.replay.push(signal);
    }

    /// Marks the population finished, closing every listener channel.
    fn complete(&mut self) {
        self.done = true;
        self.listeners.clear();
    }
}

/// One in-flight (or just-finished) cache population.
///
/// Listeners hold an `Arc` to their population; dropping the last handle
/// aborts the driver task, releasing the delegate subscription and any
/// pending store write.
pub(crate) struct Population {
    table: Arc<Mutex<ListenerTable>>,
    driver: JoinHandle<()>,
}

impl Population {
    /// Spawns the driver for one delegate subscription.
    pub(crate) fn spawn(
        delegate: Arc<dyn ServiceInstanceSupplier>,
        store: Arc<dyn CacheStore>,
        key: String,
    ) -> Arc<Self> {
        let table = Arc::new(Mutex::new(ListenerTable::new()));
        let driver = tokio::spawn(drive(delegate, store, key, Arc::clone(&table)));
        Arc::new(Self { table, driver })
    }

    /// Whether the delegate subscription is still producing.
    ///
    /// A finished population must not satisfy fresh lookups: its snapshot,
    /// if it was cacheable, is already in the store.
    pub(crate) fn is_active(&self) -> bool {
        !self.table.lock().done
    }

    /// Attaches a listener: replays materialized signals, then live ones.
    pub(crate) fn attach(self: &Arc<Self>) -> InstanceStream {
        let mut table = self.table.lock();
        let replay = stream::iter(table.replay.clone());
        let items: BoxStream<'static, Signal> = if table.done {
            replay.boxed()
        } else {
            let (tx, rx) = mpsc::unbounded();
            table.listeners.push(tx);
            replay.chain(rx).boxed()
        };
        drop(table);

        PopulationStream {
            items,
            _population: Arc::clone(self),
        }
        .boxed()
    }
}

impl Drop for Population {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// Subscribes to the delegate once, fanning every signal out to listeners
/// before writing usable snapshots back to the store.
///
/// Forwarding happens before the store write is awaited, so a slow or
/// failing store never delays a caller's emission. Empty snapshots are
/// forwarded but never written.
async fn drive(
    delegate: Arc<dyn ServiceInstanceSupplier>,
    store: Arc<dyn CacheStore>,
    key: String,
    table: Arc<Mutex<ListenerTable>>,
) {
    let mut snapshots = delegate.get();
    while let Some(signal) = snapshots.next().await {
        match signal {
            Ok(snapshot) => {
                let cacheable = !snapshot.is_empty();
                table.lock().publish(Ok(snapshot.clone()));

                if !cacheable {
                    debug!("Skipping cache write of empty snapshot for '{}'", key);
                } else if let Err(e) = store.put(&key, &snapshot).await {
                    error!("Unable to write cache entry '{}': {}", key, e);
                }
            }
            Err(e) => {
                let mut table = table.lock();
                table.publish(Err(e));
                table.complete();
                return;
            }
        }
    }
    table.lock().complete();
}

/// Listener stream that keeps its population alive while draining.
struct PopulationStream {
    items: BoxStream<'static, Signal>,
    _population: Arc<Population>,
}

impl Stream for PopulationStream {
    type Item = Signal;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.items.poll_next_unpin(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheStore;
    use crate::fixed::FixedServiceInstanceSupplier;
    use std::time::Duration;
    use vela_core::{ServiceId, ServiceInstance};

    /// Supplier whose stream never emits, for pending-state assertions.
    struct NeverSupplier {
        service_id: ServiceId,
    }

    impl ServiceInstanceSupplier for NeverSupplier {
        fn service_id(&self) -> &ServiceId {
            &self.service_id
        }

        fn get(&self) -> InstanceStream {
            stream::pending().boxed()
        }
    }

    fn store() -> Arc<dyn CacheStore> {
        Arc::new(InMemoryCacheStore::new(Duration::from_secs(30)))
    }

    #[tokio::test]
    async fn test_attach_after_completion_replays_materialized_signals() {
        let delegate = Arc::new(FixedServiceInstanceSupplier::with_instances(
            "orders",
            vec![ServiceInstance::new("10.0.0.1", 8080)],
        ));
        let population = Population::spawn(delegate, store(), "k".to_string());

        for _ in 0..50 {
            if !population.is_active() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!population.is_active());

        let replayed: Vec<_> = population.attach().collect().await;
        assert_eq!(replayed.len(), 1);
        assert_eq!(replayed[0].as_ref().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listener_pending_until_delegate_emits() {
        let delegate = Arc::new(NeverSupplier {
            service_id: ServiceId::new("orders"),
        });
        let population = Population::spawn(delegate, store(), "k".to_string());
        assert!(population.is_active());

        let mut listener = population.attach();
        let mut next = tokio_test::task::spawn(listener.next());
        tokio_test::assert_pending!(next.poll());
    }
}
