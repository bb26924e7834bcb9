//! Entity attributes tool.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::dataverse::{PowerPlatformService, collection_len};
use crate::domains::tools::definitions::common::json_result;
use crate::domains::tools::{ToolDefinition, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the entity attributes tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityAttributesParams {
    /// Logical name of the entity (e.g. "account").
    pub entity_name: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Lists every attribute (column) of an entity.
pub struct GetEntityAttributesTool;

impl GetEntityAttributesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-entity-attributes";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get all attributes for a Dataverse entity";

    #[instrument(skip_all, fields(entity = %params.entity_name))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: EntityAttributesParams,
    ) -> Result<CallToolResult, ToolError> {
        let attributes = service.get_entity_attributes(&params.entity_name).await?;
        info!("Fetched {} attributes", collection_len(&attributes));
        json_result(&attributes)
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: EntityAttributesParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}
