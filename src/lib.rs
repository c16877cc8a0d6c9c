//! API2MCP Server Library
//!
//! Exposes externally hosted HTTP APIs as MCP tools. Each entry of the
//! service definitions file (a YAML `api_services` list) becomes one tool
//! whose parameters mirror the entry's declared request parameters. A small
//! admin HTTP API manages the definitions and re-synthesizes the tools at
//! runtime.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **services**: service definitions, their YAML store and the admin API
//!   - **tools**: request execution, tool synthesis and the tool registry
//!
//! # Example
//!
//! ```rust,no_run
//! use api2mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     let report = server.initialize().await?;
//!     println!("{} tools registered", report.registered.len());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
