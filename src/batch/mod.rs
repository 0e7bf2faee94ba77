// Batch module - queue message handling and partial-failure reporting
mod coordinator;
mod types;

pub use coordinator::BatchCoordinator;
pub use types::*;
