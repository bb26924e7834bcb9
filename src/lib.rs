//! Power Platform MCP Server Library
//!
//! Exposes read-only Dataverse operations (entity metadata, attributes,
//! relationships, global option sets, records and OData queries) as MCP tools,
//! reachable over the MCP protocol and over a plain `POST /invoke` endpoint.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and transports
//! - **dataverse**: the [`PowerPlatformService`](dataverse::PowerPlatformService)
//!   trait and its Web API client
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the tool table and its dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use powerplatform_mcp::{core::Config, core::McpServer, dataverse::DataverseClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let client = DataverseClient::new(&config.dataverse)?;
//!     let server = McpServer::new(config, Arc::new(client));
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod dataverse;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
