//! Tool handler abstraction.
//!
//! A [`ToolHandler`] is a named callable with an explicit, ordered
//! parameter list and a single invocation entry point taking a
//! name to value mapping. The MCP tool schema is built from that
//! metadata rather than from any compiled signature.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};

/// One declared tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParameter {
    /// Parameter name as advertised to clients.
    pub name: String,

    /// Value used when a caller omits the parameter.
    pub default: Value,
}

/// A callable registered with the MCP server.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the name of this tool.
    fn name(&self) -> &str;

    /// Get the description of this tool.
    fn description(&self) -> &str;

    /// Declared parameters, in order.
    fn parameters(&self) -> &[ToolParameter];

    /// Invoke the tool. Always returns a JSON-encoded string.
    async fn call(&self, arguments: &JsonObject) -> String;

    /// Build the rmcp Tool model (metadata) for this handler.
    fn to_tool(&self) -> Tool {
        Tool {
            name: self.name().to_string().into(),
            description: Some(self.description().to_string().into()),
            input_schema: Arc::new(input_schema(self.parameters())),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Build a JSON Schema object describing the given parameters.
///
/// Every parameter carries its default, so none is listed as required.
pub fn input_schema(parameters: &[ToolParameter]) -> JsonObject {
    let properties: JsonObject = parameters
        .iter()
        .map(|param| {
            let mut property = JsonObject::new();
            property.insert("title".to_string(), json!(param.name));
            if let Some(kind) = json_type(&param.default) {
                property.insert("type".to_string(), json!(kind));
            }
            property.insert("default".to_string(), param.default.clone());
            (param.name.clone(), Value::Object(property))
        })
        .collect();

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    schema
}

/// JSON Schema type name for a default value, `None` for null.
fn json_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some("boolean"),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some("integer"),
        Value::Number(_) => Some("number"),
        Value::String(_) => Some("string"),
        Value::Array(_) => Some("array"),
        Value::Object(_) => Some("object"),
    }
}
