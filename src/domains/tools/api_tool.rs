//! API tool - a tool synthesized from a service definition.
//!
//! The declared `request.params` become the tool's named parameters, in
//! declaration order. Invoking the tool fills omitted parameters with their
//! declared defaults and delegates to the [`RequestExecutor`].

use rmcp::model::JsonObject;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::error::ToolError;
use super::executor::RequestExecutor;
use super::handlers::{ToolHandler, ToolParameter};
use crate::domains::services::ServiceDefinition;

/// A callable proxying one external HTTP API.
///
/// The tool holds its own copy of the definition: later edits to the
/// store are not seen until the tool is synthesized again.
#[derive(Debug, Clone)]
pub struct ApiTool {
    service: ServiceDefinition,
    parameters: Vec<ToolParameter>,
    executor: RequestExecutor,
}

impl ApiTool {
    /// Synthesize a tool from a service definition.
    ///
    /// Fails with [`ToolError::InvalidServiceDefinition`] when `name`,
    /// `endpoint` or `auth_type` is missing.
    pub fn synthesize(service: ServiceDefinition, executor: RequestExecutor) -> Result<Self, ToolError> {
        let missing = service.missing_fields();
        if !missing.is_empty() {
            return Err(ToolError::invalid_definition(missing));
        }

        let parameters = service
            .request
            .params
            .iter()
            .map(|(name, default)| ToolParameter {
                name: name.clone(),
                default: default.clone(),
            })
            .collect();

        debug!("Synthesized tool '{}'", service.name);

        Ok(Self {
            service,
            parameters,
            executor,
        })
    }

    /// Invoke the tool and return the normalized result value.
    #[instrument(skip_all, fields(tool = %self.service.name))]
    pub async fn invoke(&self, arguments: &JsonObject) -> Value {
        info!("Invoking API tool");
        let params = RequestExecutor::resolve_params(&self.service, arguments);
        self.executor.execute(&self.service, &params).await
    }
}

#[async_trait::async_trait]
impl ToolHandler for ApiTool {
    fn name(&self) -> &str {
        &self.service.name
    }

    fn description(&self) -> &str {
        &self.service.description
    }

    fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    async fn call(&self, arguments: &JsonObject) -> String {
        self.invoke(arguments).await.to_string()
    }
}
