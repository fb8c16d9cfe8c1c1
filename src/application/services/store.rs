//! Current-snapshot holder with a single-writer version swap.
//!
//! Readers take a cheap `Arc` snapshot and never block writers for longer
//! than the pointer swap. Writers are serialized; each builds the next
//! snapshot by path copy and installs it atomically.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, instrument, trace};

use crate::application::{ApplicationResult, QueueUpdate};
use crate::domain::{Node, PoolStats, PortFields, PortQueueFields, RecyclingPool, SwitchState};

pub struct StateStore {
    current: RwLock<Arc<SwitchState>>,
    writer: Mutex<()>,
    port_pool: RecyclingPool<PortFields>,
    queue_pool: RecyclingPool<PortQueueFields>,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("generation", &self.generation())
            .field("port_pool", &self.port_pool)
            .field("queue_pool", &self.queue_pool)
            .finish()
    }
}

impl StateStore {
    /// Wrap an initial state; it is published if it is not already.
    pub fn new(mut initial: Arc<SwitchState>, pool_capacity: usize) -> Self {
        Node::publish_shared(&mut initial);
        Self {
            current: RwLock::new(initial),
            writer: Mutex::new(()),
            port_pool: RecyclingPool::new(pool_capacity),
            queue_pool: RecyclingPool::new(pool_capacity),
        }
    }

    pub fn snapshot(&self) -> Arc<SwitchState> {
        Arc::clone(&self.current.read())
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    /// Apply `update` and install the result as the current snapshot.
    ///
    /// On error the current snapshot is left in place.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&self, update: &QueueUpdate) -> ApplicationResult<Arc<SwitchState>> {
        let _writer = self.writer.lock();
        let base = self.snapshot();
        let next = update.apply_with(&base, &self.port_pool, &self.queue_pool)?;

        let previous = std::mem::replace(&mut *self.current.write(), Arc::clone(&next));
        drop(base);
        debug!(generation = next.generation(), "snapshot swapped");

        self.reclaim(previous);
        Ok(next)
    }

    /// Return the containers of a retired snapshot to the pools.
    ///
    /// Only nodes nobody else references are reclaimed: anything still shared
    /// with the current snapshot or held by a reader is left alone.
    fn reclaim(&self, retired: Arc<SwitchState>) {
        let Ok(root) = Arc::try_unwrap(retired) else {
            trace!("retired snapshot still referenced");
            return;
        };
        let mut root = root.into_fields();
        let ids = root.ports().iter().map(|p| p.id()).collect::<Vec<_>>();
        for id in ids {
            let Some(port) = root.remove_port(id) else {
                continue;
            };
            let Ok(port) = Arc::try_unwrap(port) else {
                continue;
            };
            let mut fields = port.into_fields();
            let queue_ids = fields.queues().iter().map(|q| q.id()).collect::<Vec<_>>();
            for qid in queue_ids {
                if let Some(queue) = fields.remove_queue(qid) {
                    self.queue_pool.recycle_shared(queue);
                }
            }
            self.port_pool.recycle_fields(fields);
        }
    }

    pub fn pool_stats(&self) -> (PoolStats, PoolStats) {
        (self.port_pool.stats(), self.queue_pool.stats())
    }
}
