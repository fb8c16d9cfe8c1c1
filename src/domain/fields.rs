//! Capability traits binding a field container to the generic node.

use std::fmt;

use crate::domain::error::DomainResult;
use crate::domain::value::StructuredValue;

/// Data payload of one node type.
///
/// A container holds plain attributes plus child slots (`Arc<Node<_>>`). It
/// knows how to enumerate its children and how to convert itself to and from
/// a [`StructuredValue`]; it has no other behavior.
///
/// `Clone` must be a value copy of the attributes; child slots are cloned by
/// bumping their reference count, since published children are immutable.
pub trait NodeFields: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Node type name used in logs and error messages.
    const NAME: &'static str;

    /// Visit each child node once, in declaration order of the child slots.
    fn for_each_child(&self, _visit: &mut dyn FnMut(&dyn AnyNode)) {}

    /// Publish every child slot; called when the owning node is published.
    /// Implementations use [`Node::publish_shared`](crate::domain::Node::publish_shared).
    fn publish_children(&mut self) {}

    fn to_structured(&self) -> StructuredValue;

    fn from_structured(value: &StructuredValue) -> DomainResult<Self>;

    /// One-line label for tree rendering.
    fn label(&self) -> String {
        Self::NAME.to_string()
    }
}

/// Type-erased read-only view of a node, used where children of different
/// types are handled uniformly (traversal, rendering).
pub trait AnyNode: fmt::Debug + Send + Sync {
    fn node_name(&self) -> &'static str;

    fn label(&self) -> String;

    fn is_published(&self) -> bool;

    fn generation(&self) -> u64;

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AnyNode));

    fn to_structured(&self) -> StructuredValue;
}
