//! Application layer: services and use cases
//!
//! This layer loads and stores snapshots and performs copy-on-write updates
//! on top of the domain node core.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use services::{QueueUpdate, StateFile, StateStore};
