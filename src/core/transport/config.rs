//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport with JSON-RPC over POST, admin API on the same port.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

/// Check a JSON-RPC path against the routes sharing its listener.
///
/// A leading `/` is added when missing.
#[cfg(feature = "http")]
fn validate_rpc_path(raw: &str) -> Result<String, &'static str> {
    let path = format!("/{}", raw.trim().trim_start_matches('/'));
    if path == "/services" || path.starts_with("/services/") {
        return Err("it overlaps the admin API");
    }
    Ok(path)
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            Self::Stdio
        }

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        {
            Self::Http(HttpConfig::default())
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl TransportConfig {
    /// Create an HTTP transport config.
    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    ///
    /// Rejected values fall back to their defaults and are reported in
    /// `warnings`, since logging may not be installed yet.
    pub fn from_env(warnings: &mut Vec<String>) -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "http")]
            "http" => {
                let port = std::env::var("MCP_HTTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080);
                let host = std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host());
                let rpc_path = match std::env::var("MCP_HTTP_PATH") {
                    Ok(path) => match validate_rpc_path(&path) {
                        Ok(path) => path,
                        Err(reason) => {
                            warnings.push(format!(
                                "Ignoring MCP_HTTP_PATH '{}': {}, using {}",
                                path,
                                reason,
                                default_rpc_path()
                            ));
                            default_rpc_path()
                        }
                    },
                    Err(_) => default_rpc_path(),
                };
                let enable_cors = std::env::var("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true);
                Self::Http(HttpConfig {
                    port,
                    host,
                    rpc_path,
                    enable_cors,
                })
            }
            _ => Self::default(),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }

    /// Whether the admin API is served by this transport's own listener.
    pub fn serves_admin(&self) -> bool {
        #[cfg(feature = "http")]
        {
            matches!(self, Self::Http(_))
        }
        #[cfg(not(feature = "http"))]
        {
            false
        }
    }
}

#[cfg(all(test, feature = "stdio", feature = "http"))]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stdio() {
        let config = TransportConfig::default();
        assert!(matches!(config, TransportConfig::Stdio));
        assert!(!config.serves_admin());
    }

    #[test]
    fn test_rpc_path_must_not_shadow_admin() {
        assert_eq!(validate_rpc_path("/rpc"), Ok("/rpc".to_string()));
        assert_eq!(validate_rpc_path("rpc"), Ok("/rpc".to_string()));
        assert!(validate_rpc_path("/services").is_err());
        assert!(validate_rpc_path("services/refresh").is_err());
        assert_eq!(validate_rpc_path("/servicesx"), Ok("/servicesx".to_string()));
    }

    #[test]
    fn test_http_serves_admin() {
        let config = TransportConfig::http(9000, "0.0.0.0");
        assert!(config.serves_admin());
        assert_eq!(config.description(), "HTTP on 0.0.0.0:9000/mcp");
    }
}
