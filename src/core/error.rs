//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type for server startup and the
//! transport layer. Tool failures stay in-band and never reach it.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the services domain.
    #[error("Service error: {0}")]
    Service(#[from] crate::domains::services::ServiceError),

    /// Error originating from a transport.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}
