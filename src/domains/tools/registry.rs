//! Tool Registry - the set of tools currently exposed to MCP clients.
//!
//! This module provides:
//! - Wholesale replacement of the registered tools (startup and refresh)
//! - Lookup and dispatch of tool calls by name
//! - Tool metadata for listing
//!
//! The registry is a point-in-time snapshot. It does not follow edits to
//! the service store until the tools are rebuilt and swapped in.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rmcp::model::{JsonObject, Tool};
use tracing::{info, warn};

use super::error::ToolError;
use super::handlers::ToolHandler;

/// Shared handle to a registered tool.
pub type SharedTool = Arc<dyn ToolHandler>;

/// Tool registry - manages all currently registered tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<Vec<SharedTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every registered tool with the given set, in order.
    pub fn replace_all(&self, tools: Vec<SharedTool>) {
        let names: Vec<_> = tools.iter().map(|t| t.name().to_string()).collect();
        *self.write() = tools;
        info!("Registered {} tools: {:?}", names.len(), names);
    }

    /// Register a single tool, replacing any tool with the same name.
    pub fn register(&self, tool: SharedTool) {
        let mut tools = self.write();
        match tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => tools[index] = tool,
            None => tools.push(tool),
        }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<SharedTool> {
        self.read().iter().find(|t| t.name() == name).cloned()
    }

    /// Get all tools as Tool models (metadata), in registration order.
    pub fn list(&self) -> Vec<Tool> {
        self.read().iter().map(|t| t.to_tool()).collect()
    }

    /// Get all tool names.
    pub fn names(&self) -> Vec<String> {
        self.read().iter().map(|t| t.name().to_string()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Dispatch a call to the named tool.
    ///
    /// The lock is released before the tool runs, so a refresh may swap
    /// the registry while a call is in flight.
    pub async fn call_tool(&self, name: &str, arguments: &JsonObject) -> Result<String, ToolError> {
        let Some(tool) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };
        Ok(tool.call(arguments).await)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<SharedTool>> {
        self.tools.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<SharedTool>> {
        self.tools.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
