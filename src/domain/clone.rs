//! Clone strategies: how a published node's container is copied before mutation.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::domain::fields::NodeFields;
use crate::domain::node::Node;

/// Produces a value copy of a field container on behalf of [`Node`].
///
/// The node handles publish state and generation bookkeeping; a strategy only
/// decides where the copy's storage comes from. The copy must be equal to
/// the source. Child slots may be shared with the source, since published
/// children never change.
pub trait CloneStrategy<F: NodeFields>: Send + Sync {
    fn copy_fields(&self, source: &F) -> F;
}

/// Plain `Clone`; the default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepCopy;

impl<F: NodeFields> CloneStrategy<F> for DeepCopy {
    fn copy_fields(&self, source: &F) -> F {
        source.clone()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Copies served from a retired container.
    pub reused: u64,
    /// Copies that needed a fresh allocation.
    pub allocated: u64,
    /// Containers currently waiting for reuse.
    pub idle: usize,
}

struct PoolState<F> {
    spare: Vec<F>,
    reused: u64,
    allocated: u64,
}

/// Keeps retired containers around and copies into them with
/// [`Clone::clone_from`], reusing their heap storage (names, child vectors).
pub struct RecyclingPool<F> {
    state: Mutex<PoolState<F>>,
    capacity: usize,
}

impl<F> fmt::Debug for RecyclingPool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RecyclingPool")
            .field("capacity", &self.capacity)
            .field("idle", &state.spare.len())
            .field("reused", &state.reused)
            .field("allocated", &state.allocated)
            .finish()
    }
}

impl<F: NodeFields> RecyclingPool<F> {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(PoolState {
                spare: Vec::with_capacity(capacity),
                reused: 0,
                allocated: 0,
            }),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return an owned node's container to the pool. Dropped if the pool is full.
    pub fn recycle(&self, node: Node<F>) {
        self.recycle_fields(node.into_fields());
    }

    pub fn recycle_fields(&self, fields: F) {
        let mut state = self.state.lock();
        if state.spare.len() < self.capacity {
            state.spare.push(fields);
            trace!(node = F::NAME, idle = state.spare.len(), "container recycled");
        }
    }

    /// Recycle a shared node if this is its last reference; otherwise just drop it.
    pub fn recycle_shared(&self, node: Arc<Node<F>>) {
        if let Ok(node) = Arc::try_unwrap(node) {
            self.recycle(node);
        }
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            reused: state.reused,
            allocated: state.allocated,
            idle: state.spare.len(),
        }
    }
}

impl<F: NodeFields> CloneStrategy<F> for RecyclingPool<F> {
    fn copy_fields(&self, source: &F) -> F {
        let spare = {
            let mut state = self.state.lock();
            let spare = state.spare.pop();
            if spare.is_some() {
                state.reused += 1;
            } else {
                state.allocated += 1;
            }
            spare
        };
        match spare {
            Some(mut fields) => {
                fields.clone_from(source);
                trace!(node = F::NAME, "copied into recycled container");
                fields
            }
            None => source.clone(),
        }
    }
}
