//! Service-definition error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::domains::tools::ToolError;

/// Errors raised by the config store and the admin operations over it.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The store file is missing or could not be parsed.
    #[error("Failed to read service config {path:?}: {message}")]
    ConfigRead { path: PathBuf, message: String },

    /// The store file could not be written.
    #[error("Failed to write service config {path:?}: {message}")]
    ConfigWrite { path: PathBuf, message: String },

    /// A required field is missing from a submitted definition.
    #[error("Invalid service definition: {0}")]
    InvalidDefinition(String),

    /// A definition with the same name already exists.
    #[error("Service name already exists: {0}")]
    DuplicateName(String),

    /// No definition with the given name exists.
    #[error("Service not found: {0}")]
    NotFound(String),

    /// A tool could not be synthesized from a stored definition.
    #[error("Failed to refresh service {name}: {source}")]
    Synthesis {
        name: String,
        #[source]
        source: ToolError,
    },
}

impl ServiceError {
    /// Create a read error for the given store path.
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a write error for the given store path.
    pub fn write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a synthesis error for the named service.
    pub fn synthesis(name: impl Into<String>, source: ToolError) -> Self {
        Self::Synthesis {
            name: name.into(),
            source,
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
