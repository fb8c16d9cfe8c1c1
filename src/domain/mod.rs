//! Domain layer: the node core and the node type bindings
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod clone;
pub mod error;
pub mod fields;
pub mod node;
pub mod port;
pub mod queue;
pub mod switch;
pub mod traversal;
pub mod value;

pub use clone::{CloneStrategy, DeepCopy, PoolStats, RecyclingPool};
pub use error::{DomainError, DomainResult};
pub use fields::{AnyNode, NodeFields};
pub use node::Node;
pub use port::{AdminState, Port, PortFields};
pub use queue::{PortQueue, PortQueueFields, StreamType};
pub use switch::{SwitchState, SwitchStateFields};
pub use value::{FieldReader, StructuredMap, StructuredValue};
