//! Entity relationships tool.

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

/// Parameters for the relationships tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelationshipsParams {
    /// Logical name of the entity (e.g. "account").
    pub entity_name: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Returns `{ "oneToMany": ..., "manyToMany": ... }` for an entity.
pub struct GetEntityRelationshipsTool;

impl GetEntityRelationshipsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-entity-relationships";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get all relationships for a Dataverse entity";

    #[instrument(skip_all, fields(entity = %params.entity_name))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: EntityRelationshipsParams,
    ) -> Result<CallToolResult, ToolError> {
        let relationships = service.get_entity_relationships(&params.entity_name).await?;
        info!(
            "Fetched {} one-to-many and {} many-to-many relationships",
            relationships.one_to_many_count(),
            relationships.many_to_many_count()
        );
        json_result(&relationships)
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: EntityRelationshipsParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}
