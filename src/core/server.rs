//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the tool registry and the rmcp router derived from it.
//! The STDIO transport drives it through [`ServerHandler`]; the HTTP
//! transport calls [`McpServer::call_tool`] directly.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::config::Config;
use crate::dataverse::PowerPlatformService;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router};

/// Instructions advertised to clients on initialize.
pub const INSTRUCTIONS: &str = "Power Platform / Dataverse server. Use the entity tools to inspect \
     schema metadata, get-record and query-records to read data, and \
     use-powerplatform-prompt for a formatted entity overview.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared tool table, read-only after construction.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling protocol tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server backed by `service`.
    pub fn new(config: Config, service: Arc<dyn PowerPlatformService>) -> Self {
        let registry = Arc::new(ToolRegistry::new(service));

        Self {
            config: Arc::new(config),
            tool_router: build_tool_router::<Self>(registry.clone()),
            registry,
        }
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

    /// List all available tools in wire form.
    pub fn list_tools(&self) -> Vec<Value> {
        self.registry
            .tools()
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

    /// Call a tool by name.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ToolError> {
        self.registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
