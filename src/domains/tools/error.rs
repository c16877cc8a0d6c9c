//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur while synthesizing or invoking tools.
///
/// [`ToolError::UnsupportedMethod`] and [`ToolError::Transport`] are
/// rendered in-band as `{"error": ...}` payloads. The others reach
/// callers as failures.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The service definition lacks a field needed to build a tool.
    #[error("Invalid service definition: missing {}", .missing.join(", "))]
    InvalidServiceDefinition { missing: Vec<&'static str> },

    /// Another active definition already claimed this tool name.
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    /// The definition's request method is neither GET nor POST.
    #[error("Unsupported request method: {0}")]
    UnsupportedMethod(String),

    /// The outbound call failed at the transport level.
    #[error("{0}")]
    Transport(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create an invalid-definition error from the missing field names.
    pub fn invalid_definition(missing: Vec<&'static str>) -> Self {
        Self::InvalidServiceDefinition { missing }
    }

    /// Create a duplicate-name error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Render as the in-band error payload returned to tool callers.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}
