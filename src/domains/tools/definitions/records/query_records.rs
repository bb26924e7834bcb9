//! Query records tool.
//!
//! Runs an OData `$filter` against an entity set, capped at `maxRecords`.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, de::Error as _};
use tracing::{info, instrument};

use crate::dataverse::{PowerPlatformService, collection_len};
use crate::domains::tools::definitions::common::json_result;
use crate::domains::tools::{ToolDefinition, ToolError};

/// Record cap used when `maxRecords` is omitted (or zero).
pub const DEFAULT_MAX_RECORDS: u32 = 50;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the query records tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecordsParams {
    /// Entity set (plural) name, e.g. "accounts".
    pub entity_name_plural: String,

    /// OData filter expression, e.g. "name eq 'Contoso'".
    pub filter: String,

    /// Maximum number of records to return (default: 50).
    #[serde(default, deserialize_with = "whole_number")]
    #[schemars(with = "Option<f64>")]
    pub max_records: Option<u32>,
}

/// Accept any JSON number with an integral value (`10` or `10.0`).
fn whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(n) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if !n.is_finite() || n.fract() != 0.0 || n < 0.0 || n > f64::from(u32::MAX) {
        return Err(D::Error::custom(format!(
            "maxRecords must be a non-negative whole number, got {n}"
        )));
    }

    Ok(Some(n as u32))
}

impl QueryRecordsParams {
    /// Effective record cap.
    pub fn max_records(&self) -> u32 {
        self.max_records
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_RECORDS)
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Queries records with an OData filter.
pub struct QueryRecordsTool;

impl QueryRecordsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "query-records";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Query Dataverse records with OData filter";

    #[instrument(skip_all, fields(entity_set = %params.entity_name_plural, filter = %params.filter))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: QueryRecordsParams,
    ) -> Result<CallToolResult, ToolError> {
        let max_records = params.max_records();
        let records = service
            .query_records(&params.entity_name_plural, &params.filter, max_records)
            .await?;
        info!(
            "Query returned {} record(s) (cap {})",
            collection_len(&records),
            max_records
        );
        json_result(&records)
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: QueryRecordsParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
