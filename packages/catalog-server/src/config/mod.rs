//! Dataset configuration: the JSON file model, loading, and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::load_config;
pub use model::{DatasetConfig, LimitsConfig, ProjectConfig};
pub use validate::{build_schema, validate_project};
