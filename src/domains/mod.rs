//! Domains module containing business logic organized by bounded contexts.
//!
//! - **services**: declarative API service definitions and their admin API
//! - **tools**: synthesis and execution of the MCP tools built from them

pub mod services;
pub mod tools;
