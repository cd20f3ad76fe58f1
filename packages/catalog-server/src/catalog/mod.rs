//! Served configuration: immutable snapshots, the reload controller that
//! swaps them, and the file watcher that triggers reloads.

pub mod controller;
pub mod snapshot;
mod watcher;

pub use controller::{LifecycleError, LifecycleState, ReloadController};
pub use snapshot::{CatalogSnapshot, DatasetSource};
