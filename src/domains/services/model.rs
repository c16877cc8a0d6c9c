//! Service definition model.
//!
//! A [`ServiceDefinition`] is the declarative record describing one proxied
//! HTTP API: how to authenticate, where to send the request, and which
//! parameters the resulting tool accepts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative description of one external HTTP API exposed as a tool.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Unique identifier, also the tool name advertised to MCP clients.
    #[serde(default)]
    pub name: String,

    /// Free text used as the tool description.
    #[serde(default)]
    pub description: String,

    /// Raw auth scheme name (`none`, `basic`, `token`, `oauth`).
    ///
    /// Kept as written so unknown schemes survive a save; use
    /// [`ServiceDefinition::auth_scheme`] for the parsed form.
    #[serde(default)]
    pub auth_type: String,

    /// Scheme-specific auth fields (`username`, `password`, `token`, ...).
    #[serde(default)]
    pub auth_config: Map<String, Value>,

    /// Target URL.
    #[serde(default)]
    pub endpoint: String,

    /// Request shape: method and declared parameters with defaults.
    #[serde(default)]
    pub request: RequestSpec,

    /// Inactive definitions stay in storage but are not registered.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Request method and declared parameters of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method, case-insensitive. Only GET and POST are dispatched.
    #[serde(default = "default_method")]
    pub method: String,

    /// Ordered parameter name to default value.
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Parsed auth scheme. Unrecognized names behave as [`AuthScheme::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    None,
    Basic,
    Token,
    OAuth,
}

/// Parsed request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

/// On-disk document: a mapping with a single `api_services` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesDocument {
    #[serde(rename = "api_services", default)]
    pub services: Vec<ServiceDefinition>,
}

fn default_active() -> bool {
    true
}

fn default_method() -> String {
    "GET".to_string()
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            method: default_method(),
            params: Map::new(),
        }
    }
}

impl AuthScheme {
    /// Parse a scheme name, falling back to no auth.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "basic" => Self::Basic,
            "token" => Self::Token,
            "oauth" => Self::OAuth,
            _ => Self::None,
        }
    }
}

impl RequestMethod {
    /// Parse a method name case-insensitively. Returns `None` for anything
    /// other than GET or POST.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            _ => None,
        }
    }
}

impl ServiceDefinition {
    /// The parsed auth scheme.
    pub fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::parse(&self.auth_type)
    }

    /// Declared parameter names in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.request.params.keys().map(String::as_str).collect()
    }

    /// Names of required fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.endpoint.trim().is_empty() {
            missing.push("endpoint");
        }
        if self.auth_type.trim().is_empty() {
            missing.push("auth_type");
        }
        missing
    }

    /// Read a string field from `auth_config`. Non-string values are
    /// rendered as JSON text; absent keys yield `None`.
    pub fn auth_field(&self, key: &str) -> Option<String> {
        self.auth_config.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

/// Redacts `auth_config` values so credentials never reach the logs.
impl std::fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auth_keys: Vec<_> = self
            .auth_config
            .keys()
            .map(|k| format!("{}: [REDACTED]", k))
            .collect();

        f.debug_struct("ServiceDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("auth_type", &self.auth_type)
            .field("auth_config", &auth_keys)
            .field("endpoint", &self.endpoint)
            .field("request", &self.request)
            .field("is_active", &self.is_active)
            .finish()
    }
}
