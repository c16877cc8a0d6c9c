//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated
//! from defaults, an optional `.env` file, and `MCP_*` environment variables.

use super::transport::TransportConfig;
use crate::domains::services::RefreshPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Service definitions store and refresh behavior.
    pub services: ServicesConfig,

    /// Admin HTTP API configuration.
    pub admin: AdminConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Problems found while reading the environment, for logging once
    /// the subscriber is installed.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the services domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// YAML file holding the `api_services` list.
    pub config_path: PathBuf,

    /// How a refresh handles definitions that fail to synthesize.
    pub refresh_policy: RefreshPolicy,
}

/// Configuration for the standalone admin listener.
///
/// Under the HTTP transport the admin routes are served on the transport's
/// own listener and `host`/`port` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Whether the admin API is served at all.
    pub enabled: bool,

    /// Host address to bind to.
    pub host: String,

    /// Port number to listen on.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.yaml"),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "api2mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            services: ServicesConfig::default(),
            admin: AdminConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_SERVICES_FILE`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env(&mut config.warnings);

        if let Ok(path) = std::env::var("MCP_SERVICES_FILE") {
            config.services.config_path = PathBuf::from(path);
        }

        if let Ok(policy) = std::env::var("MCP_REFRESH_POLICY") {
            match RefreshPolicy::parse(&policy) {
                Some(p) => config.services.refresh_policy = p,
                None => config.warnings.push(format!(
                    "Unknown MCP_REFRESH_POLICY '{}', using {:?}",
                    policy, config.services.refresh_policy
                )),
            }
        }

        if let Ok(enabled) = std::env::var("MCP_ADMIN_ENABLED") {
            config.admin.enabled = enabled.to_lowercase() != "false" && enabled != "0";
        }

        if let Ok(host) = std::env::var("MCP_ADMIN_HOST") {
            config.admin.host = host;
        }

        if let Ok(port) = std::env::var("MCP_ADMIN_PORT") {
            match port.parse() {
                Ok(p) => config.admin.port = p,
                Err(_) => config.warnings.push(format!(
                    "Invalid MCP_ADMIN_PORT '{}', using {}",
                    port, config.admin.port
                )),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.services.config_path, PathBuf::from("config.yaml"));
        assert_eq!(config.services.refresh_policy, RefreshPolicy::AllOrNothing);
        assert!(config.admin.enabled);
        assert_eq!(config.admin.port, 8000);
    }

    #[test]
    fn test_services_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVICES_FILE", "/tmp/services.yaml");
            std::env::set_var("MCP_REFRESH_POLICY", "best_effort");
        }
        let config = Config::from_env();
        assert_eq!(
            config.services.config_path,
            PathBuf::from("/tmp/services.yaml")
        );
        assert_eq!(config.services.refresh_policy, RefreshPolicy::BestEffort);
        unsafe {
            std::env::remove_var("MCP_SERVICES_FILE");
            std::env::remove_var("MCP_REFRESH_POLICY");
        }
    }

    #[test]
    fn test_invalid_policy_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_REFRESH_POLICY", "whenever");
        }
        let config = Config::from_env();
        assert_eq!(config.services.refresh_policy, RefreshPolicy::AllOrNothing);
        assert_eq!(config.warnings.len(), 1);
        assert!(config.warnings[0].contains("MCP_REFRESH_POLICY"));
        unsafe {
            std::env::remove_var("MCP_REFRESH_POLICY");
        }
    }

    #[test]
    fn test_admin_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_ADMIN_ENABLED", "false");
            std::env::set_var("MCP_ADMIN_PORT", "9100");
        }
        let config = Config::from_env();
        assert!(!config.admin.enabled);
        assert_eq!(config.admin.port, 9100);
        assert!(config.warnings.is_empty());
        unsafe {
            std::env::remove_var("MCP_ADMIN_ENABLED");
            std::env::remove_var("MCP_ADMIN_PORT");
        }
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_path_over_admin_is_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "http");
            std::env::set_var("MCP_HTTP_PATH", "/services");
        }
        let config = Config::from_env();
        match &config.transport {
            TransportConfig::Http(http) => assert_eq!(http.rpc_path, "/mcp"),
            #[allow(unreachable_patterns)]
            other => panic!("expected http transport, got {:?}", other),
        }
        assert!(config.warnings.iter().any(|w| w.contains("MCP_HTTP_PATH")));
        unsafe {
            std::env::remove_var("MCP_TRANSPORT");
            std::env::remove_var("MCP_HTTP_PATH");
        }
    }
}
