//! Tool system and built-in tools

pub mod base;
pub mod builtin;
pub mod registry;
pub mod utils;

pub use base::{Tool, ToolCall, ToolResult, ToolSpec};
pub use builtin::default_registry;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
