//! Single entity attribute tool.
//!
//! An attribute that does not exist is reported by Dataverse as an error and
//! surfaces as a tool failure, never as an empty result.

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

/// Parameters for the single attribute tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityAttributeParams {
    /// Logical name of the entity (e.g. "account").
    pub entity_name: String,

    /// Logical name of the attribute (e.g. "name").
    pub attribute_name: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Fetches the metadata of one attribute.
pub struct GetEntityAttributeTool;

impl GetEntityAttributeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-entity-attribute";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get a specific attribute from an entity";

    #[instrument(skip_all, fields(entity = %params.entity_name, attribute = %params.attribute_name))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: EntityAttributeParams,
    ) -> Result<CallToolResult, ToolError> {
        info!("Fetching attribute metadata");
        let attribute = service
            .get_entity_attribute(&params.entity_name, &params.attribute_name)
            .await?;
        json_result(&attribute)
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: EntityAttributeParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}
