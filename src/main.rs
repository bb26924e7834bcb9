//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, connects the Dataverse client
//! and starts the server with the configured transport.

use anyhow::Result;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use powerplatform_mcp::core::{Config, McpServer, TransportService};
use powerplatform_mcp::dataverse::DataverseClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    config.log_warnings();

    let client = DataverseClient::new(&config.dataverse)?;
    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, Arc::new(client));

    info!("Server initialized with {} tools", server.registry().len());

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
