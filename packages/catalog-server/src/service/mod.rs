//! Tool service: the calling-layer contract over the catalog.
//!
//! 1. **Tools** (`tools`): names, discovery metadata, argument and result shapes
//! 2. **Filters** (`filter`): strict JSON filter parsing
//! 3. **Dispatch** (`catalog`): runs a tool against the active snapshot and logs it
//! 4. **Errors** (`operation`): failure taxonomy and wire error codes

pub mod catalog;
pub mod filter;
pub mod operation;
pub mod tools;

pub use catalog::CatalogService;
pub use filter::{parse_filter, FilterParseError};
pub use operation::{ErrorCode, OperationError};
pub use tools::{tool_descriptors, tool_names, ToolDescriptor};
