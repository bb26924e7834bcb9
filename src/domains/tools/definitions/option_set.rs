//! Global option set tool.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::dataverse::PowerPlatformService;
use crate::domains::tools::definitions::common::json_result;
use crate::domains::tools::{ToolDefinition, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the global option set tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalOptionSetParams {
    /// Name of the global option set (e.g. "budgetstatus").
    pub option_set_name: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Fetches a global option set (a named enumeration shared by attributes).
pub struct GetGlobalOptionSetTool;

impl GetGlobalOptionSetTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-global-option-set";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get a global option set by name";

    #[instrument(skip_all, fields(option_set = %params.option_set_name))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: GlobalOptionSetParams,
    ) -> Result<CallToolResult, ToolError> {
        info!("Fetching global option set");
        let option_set = service.get_global_option_set(&params.option_set_name).await?;
        json_result(&option_set)
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: GlobalOptionSetParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}
