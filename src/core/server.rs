//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol on top of the refreshable [`ToolRegistry`].
//!
//! ## Tool Architecture
//!
//! Tools are not compiled in. They are synthesized from the service
//! definitions file at startup and again on every admin refresh, and the
//! handler reads whatever set is registered at the time of each request.

use axum::Router;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::services::{AdminService, RefreshReport, ServiceStore, admin_router};
use crate::domains::tools::{RequestExecutor, ToolRegistry};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and shares
/// its tool registry with the admin service that refreshes it.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Currently registered tools.
    registry: Arc<ToolRegistry>,

    /// Admin operations over service definitions.
    admin: Arc<AdminService>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// No tool is registered until [`McpServer::initialize`] runs.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(ToolRegistry::new());

        let admin = Arc::new(AdminService::new(
            ServiceStore::new(config.services.config_path.clone()),
            registry.clone(),
            RequestExecutor::new(),
            config.services.refresh_policy,
        ));

        Self {
            config,
            registry,
            admin,
        }
    }

    /// Load the service definitions and register a tool for each active one.
    ///
    /// Must complete before the transport starts accepting calls. A missing
    /// or unreadable definitions file is fatal.
    pub async fn initialize(&self) -> Result<RefreshReport> {
        let report = self.admin.refresh().await?;
        info!(
            "Registered {} API tools from {:?}",
            report.registered.len(),
            self.config.services.config_path
        );
        Ok(report)
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Get the admin service.
    pub fn admin(&self) -> &Arc<AdminService> {
        &self.admin
    }

    /// Build the admin API router, with request tracing.
    pub fn admin_router(&self) -> Router {
        admin_router(self.admin.clone()).layer(TraceLayer::new_for_http())
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .list()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, String> {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            _ => return Err("Tool arguments must be an object".to_string()),
        };

        let output = self
            .registry
            .call_tool(name, &arguments)
            .await
            .map_err(|e| e.to_string())?;

        let result = CallToolResult::success(vec![Content::text(output)]);
        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Each tool proxies a configured external HTTP API. Tool results are JSON \
                 strings; failed calls return an object with an \"error\" field."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.registry.list(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        let arguments = request.arguments.unwrap_or_default();

        let output = self
            .registry
            .call_tool(&request.name, &arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }
}
