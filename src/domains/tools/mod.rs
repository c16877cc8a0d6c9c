//! Tools domain module.
//!
//! This module turns service definitions into MCP tools and runs them.
//!
//! ## Architecture
//!
//! - `api_tool.rs` - Synthesizes a tool from a service definition
//! - `executor.rs` - Performs the authenticated outbound call
//! - `auth.rs` - Authorization header construction
//! - `handlers.rs` - The `ToolHandler` callable trait and schema builder
//! - `registry.rs` - The refreshable set of registered tools
//! - `error.rs` - Tool-specific error types

mod api_tool;
pub mod auth;
mod error;
pub mod executor;
mod handlers;
mod registry;

pub use api_tool::ApiTool;
pub use error::ToolError;
pub use executor::{REQUEST_TIMEOUT, RequestExecutor};
pub use handlers::{ToolHandler, ToolParameter, input_schema};
pub use registry::{SharedTool, ToolRegistry};
