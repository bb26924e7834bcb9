//! Entity metadata tool.
//!
//! Returns the full entity definition of a Dataverse table as indented JSON.

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

/// Parameters for the entity metadata tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadataParams {
    /// Logical name of the entity (e.g. "account").
    pub entity_name: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Entity metadata tool.
pub struct GetEntityMetadataTool;

impl GetEntityMetadataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-entity-metadata";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get metadata for a Dataverse entity";

    #[instrument(skip_all, fields(entity = %params.entity_name))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: EntityMetadataParams,
    ) -> Result<CallToolResult, ToolError> {
        info!("Fetching entity metadata");
        let metadata = service.get_entity_metadata(&params.entity_name).await?;
        json_result(&metadata)
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: EntityMetadataParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}
