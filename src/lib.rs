//! Copy-on-write, publish-once node tree for switch configuration state.
//!
//! The core is [`domain::Node`]: a generic wrapper over a field container
//! that is edited in place while unpublished and copied before any edit once
//! published, so readers can keep immutable, structure-shared snapshots while
//! writers build the next version.
//!
//! ```
//! use swstate::domain::{Node, PortQueue, PortQueueFields, StreamType};
//!
//! let mut queue = PortQueue::new(PortQueueFields::new(3, StreamType::Unicast));
//! queue.fields_mut().unwrap().set_weight(10).unwrap();
//! let published = queue.into_published();
//!
//! let mut slot = published.clone();
//! Node::modify(&mut slot).set_weight(20).unwrap();
//! assert_eq!(published.weight(), Some(10));
//! assert_eq!(slot.weight(), Some(20));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
