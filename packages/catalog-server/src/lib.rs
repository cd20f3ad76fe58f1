//! Catalog server: dataset configuration loading and hot reload, CSV-backed
//! storage, the tool service, and its HTTP transport.

pub mod catalog;
pub mod config;
pub mod network;
pub mod service;
pub mod storage;

pub use catalog::{CatalogSnapshot, LifecycleError, LifecycleState, ReloadController};
pub use config::{load_config, ProjectConfig};
pub use network::{NetworkConfig, NetworkModule, ShutdownSignal};
pub use service::{CatalogService, ErrorCode, OperationError};
