pub mod registry;
pub mod runner;
pub mod sanitize;
pub mod tools;

pub use registry::{
    builtin_registry, RegistryError, SharedTool, StudioTool, ToolContext, ToolError, ToolRegistry,
    ToolSchema,
};
pub use runner::{ToolLoop, ToolOutcome};
pub use sanitize::{sanitize_tool_calls, ALLOWED_TOOLS};
