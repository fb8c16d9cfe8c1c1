//! Copy-on-write queue edits against a published snapshot.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    CloneStrategy, DeepCopy, Node, PortFields, PortQueueFields, StreamType, SwitchState,
};

/// Changes to apply to one queue. Unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueUpdate {
    pub port: u16,
    pub queue: u8,
    pub weight: Option<i32>,
    pub priority: Option<i32>,
    pub stream_type: Option<StreamType>,
}

impl QueueUpdate {
    pub fn new(port: u16, queue: u8) -> Self {
        Self {
            port,
            queue,
            ..Self::default()
        }
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn stream_type(mut self, stream_type: StreamType) -> Self {
        self.stream_type = Some(stream_type);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.priority.is_none() && self.stream_type.is_none()
    }

    /// Produce the next published snapshot. `state` is never modified.
    pub fn apply(&self, state: &Arc<SwitchState>) -> ApplicationResult<Arc<SwitchState>> {
        self.apply_with(state, &DeepCopy, &DeepCopy)
    }

    /// Like [`apply`](Self::apply), copying ports and queues through the given strategies.
    ///
    /// Only the root, the edited port and the edited queue are copied; every
    /// other port and queue is shared with `state`.
    #[instrument(level = "debug", skip(state, ports, queues))]
    pub fn apply_with(
        &self,
        state: &Arc<SwitchState>,
        ports: &dyn CloneStrategy<PortFields>,
        queues: &dyn CloneStrategy<PortQueueFields>,
    ) -> ApplicationResult<Arc<SwitchState>> {
        let mut next = Arc::clone(state);

        let root = Node::modify(&mut next);
        let port_slot = root
            .port_slot_mut(self.port)
            .ok_or_else(|| ApplicationError::not_found(format!("port {}", self.port)))?;
        let port = Node::modify_with(port_slot, ports);
        let queue_slot = port.queue_slot_mut(self.queue).ok_or_else(|| {
            ApplicationError::not_found(format!("queue {} on port {}", self.queue, self.port))
        })?;
        let queue = Node::modify_with(queue_slot, queues);

        if let Some(weight) = self.weight {
            queue.set_weight(weight)?;
        }
        if let Some(priority) = self.priority {
            queue.set_priority(priority)?;
        }
        if let Some(stream_type) = self.stream_type {
            queue.set_stream_type(stream_type);
        }

        Node::publish_shared(&mut next);
        debug!(generation = next.generation(), "queue update applied");
        Ok(next)
    }
}
