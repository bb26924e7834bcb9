//! Tools domain module.
//!
//! Tools are the operations MCP clients invoke against Dataverse. Each tool
//! pairs a typed parameter struct with an async handler over a
//! [`PowerPlatformService`](crate::dataverse::PowerPlatformService).
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - Type-erased [`ToolDefinition`] entries
//! - `registry.rs` - Name lookup and dispatch shared by every transport
//! - `router.rs` - rmcp `ToolRouter` derived from the registry
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a params struct, `execute()`
//!    and `definition()`
//! 2. Add its `definition()` to [`definitions::all`]
//!
//! The registry, the rmcp router and the HTTP endpoints pick it up from there.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::{ToolDefinition, ToolFuture};
pub use registry::ToolRegistry;
pub use router::{build_tool_router, into_protocol_result};
