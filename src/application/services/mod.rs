//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod state_file;
mod store;
mod update;

pub use state_file::StateFile;
pub use store::StateStore;
pub use update::QueueUpdate;
