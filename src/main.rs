//! API2MCP Server Entry Point
//!
//! Loads configuration, registers one tool per active service definition,
//! then serves them over the configured transport alongside the admin API.

use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use api2mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);
    for warning in &config.warnings {
        warn!("{}", warning);
    }
    info!("Service definitions file: {:?}", config.services.config_path);

    let server = McpServer::new(config.clone());

    // Tools must be registered before the transport accepts any call
    let report = server
        .initialize()
        .await
        .with_context(|| format!("loading {:?}", config.services.config_path))?;

    for failure in &report.failed {
        warn!("Skipped service '{}': {}", failure.name, failure.error);
    }

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so STDIO keeps stdout for protocol frames.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
