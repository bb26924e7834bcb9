//! Get record tool.

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

/// Parameters for the get record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetRecordParams {
    /// Entity set (plural) name, e.g. "accounts".
    pub entity_name_plural: String,

    /// Record GUID.
    pub record_id: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Fetches one record by primary key.
pub struct GetRecordTool;

impl GetRecordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-record";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get a record by ID";

    #[instrument(skip_all, fields(entity_set = %params.entity_name_plural, id = %params.record_id))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: GetRecordParams,
    ) -> Result<CallToolResult, ToolError> {
        info!("Fetching record");
        let record = service
            .get_record(&params.entity_name_plural, &params.record_id)
            .await?;
        json_result(&record)
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: GetRecordParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}
