//! Tool system: adapter trait, registry and built-in tools

pub mod base;
pub mod builtin;
pub mod registry;

pub use base::{ParamKind, ParamSpec, Tool, ToolCall, ToolResult};
pub use registry::{coerce_positional, ToolRegistry};
