//! Generic publish-once, copy-on-write node.
//!
//! A [`Node`] wraps one field container. While unpublished it is owned by a
//! single writer and edited in place. Once published it is immutable and may
//! be shared (`Arc<Node<F>>`) by any number of parents, snapshots and threads.
//! Changing a published node means cloning it, editing the clone, publishing
//! the clone and installing it at the parent; the old instance never changes.
//!
//! ```text
//! Unpublished --publish()--> Published
//!      ^                         |
//!      +------ modify()/clone ---+   (new instance, generation + 1)
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::domain::clone::{CloneStrategy, DeepCopy};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::fields::{AnyNode, NodeFields};
use crate::domain::value::StructuredValue;

pub struct Node<F: NodeFields> {
    fields: F,
    published: bool,
    generation: u64,
}

impl<F: NodeFields> Node<F> {
    /// New unpublished node at generation 0.
    pub fn new(fields: F) -> Self {
        Self {
            fields,
            published: false,
            generation: 0,
        }
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    /// Number of clone cycles this value has gone through.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    /// Mark the node, and every child reachable from it, immutable. Idempotent.
    pub fn publish(&mut self) {
        if !self.published {
            self.fields.publish_children();
            trace!(node = F::NAME, generation = self.generation, "publish");
            self.published = true;
        }
    }

    /// Publish and move into shared ownership.
    pub fn into_published(mut self) -> Arc<Self> {
        self.publish();
        Arc::new(self)
    }

    /// Publish the node held in a shared slot.
    ///
    /// A uniquely owned node is published in place. An unpublished node that
    /// is already shared is left alone for its other holders; the slot gets a
    /// published copy at the same generation instead.
    pub fn publish_shared(slot: &mut Arc<Self>) {
        if slot.published {
            return;
        }
        match Arc::get_mut(slot) {
            Some(node) => node.publish(),
            None => {
                let mut copy = Self {
                    fields: slot.fields.clone(),
                    published: false,
                    generation: slot.generation,
                };
                copy.publish();
                *slot = Arc::new(copy);
            }
        }
    }

    /// Mutable access to the container, only while unpublished.
    pub fn fields_mut(&mut self) -> Option<&mut F> {
        if self.published {
            None
        } else {
            Some(&mut self.fields)
        }
    }

    /// Detached unpublished copy using the default strategy.
    pub fn clone_node(&self) -> Self {
        self.clone_with(&DeepCopy)
    }

    /// Detached unpublished copy produced by `strategy`.
    pub fn clone_with(&self, strategy: &dyn CloneStrategy<F>) -> Self {
        trace!(node = F::NAME, generation = self.generation, "clone");
        Self {
            fields: strategy.copy_fields(&self.fields),
            published: false,
            generation: self.generation + 1,
        }
    }

    /// Copy-on-write access through a shared slot.
    ///
    /// If the slot holds an unpublished node nobody else references, it is
    /// edited in place. Otherwise a fresh unpublished clone replaces the
    /// slot's contents and is returned for editing; every other reference to
    /// the previous node keeps seeing it unchanged.
    pub fn modify(slot: &mut Arc<Self>) -> &mut F {
        Self::modify_with(slot, &DeepCopy)
    }

    pub fn modify_with<'a>(slot: &'a mut Arc<Self>, strategy: &dyn CloneStrategy<F>) -> &'a mut F {
        if slot.published || Arc::get_mut(slot).is_none() {
            let copy = slot.clone_with(strategy);
            *slot = Arc::new(copy);
        }
        // Uniquely owned now, so this never copies again.
        &mut Arc::make_mut(slot).fields
    }

    pub fn into_fields(self) -> F {
        self.fields
    }

    pub fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AnyNode)) {
        self.fields.for_each_child(visit);
    }

    pub fn to_structured(&self) -> StructuredValue {
        self.fields.to_structured()
    }

    /// Unpublished node from a serialized container.
    pub fn from_structured(value: &StructuredValue) -> DomainResult<Self> {
        F::from_structured(value).map(Self::new)
    }

    pub fn to_json(&self, pretty: bool) -> DomainResult<String> {
        self.to_structured()
            .to_json(pretty)
            .map_err(|e| DomainError::malformed(F::NAME, e.to_string()))
    }

    pub fn from_json(text: &str) -> DomainResult<Self> {
        Self::from_structured(&StructuredValue::from_json(text)?)
    }
}

/// Same as [`Node::clone_node`]: `.clone()` yields the next version of the
/// value, not a duplicate of this instance. The copy is unpublished and its
/// generation is one higher. [`Arc::make_mut`] depends on this when a slot is
/// still shared.
impl<F: NodeFields> Clone for Node<F> {
    fn clone(&self) -> Self {
        self.clone_node()
    }
}

/// Value equality over the container only; publish state and generation are ignored.
impl<F: NodeFields> PartialEq for Node<F> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<F: NodeFields + Eq> Eq for Node<F> {}

impl<F: NodeFields> fmt::Debug for Node<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(F::NAME)
            .field("published", &self.published)
            .field("generation", &self.generation)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<F: NodeFields> AnyNode for Node<F> {
    fn node_name(&self) -> &'static str {
        F::NAME
    }

    fn label(&self) -> String {
        self.fields.label()
    }

    fn is_published(&self) -> bool {
        self.published
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AnyNode)) {
        self.fields.for_each_child(visit);
    }

    fn to_structured(&self) -> StructuredValue {
        self.fields.to_structured()
    }
}
