//! Tool definitions module.
//!
//! One file per tool. [`all`] is the single tool table: the rmcp router and
//! the HTTP dispatch endpoint are both built from it.

pub mod common;
pub mod entity;
pub mod option_set;
pub mod prompt;
pub mod records;

pub use entity::{
    GetEntityAttributeTool, GetEntityAttributesTool, GetEntityMetadataTool,
    GetEntityRelationshipsTool,
};
pub use option_set::GetGlobalOptionSetTool;
pub use prompt::{PromptType, UsePowerPlatformPromptTool};
pub use records::{DEFAULT_MAX_RECORDS, GetRecordTool, QueryRecordsTool};

use super::ToolDefinition;

/// Every tool this server exposes.
pub fn all() -> Vec<ToolDefinition> {
    vec![
        UsePowerPlatformPromptTool::definition(),
        GetEntityMetadataTool::definition(),
        GetEntityAttributesTool::definition(),
        GetEntityAttributeTool::definition(),
        GetEntityRelationshipsTool::definition(),
        GetGlobalOptionSetTool::definition(),
        GetRecordTool::definition(),
        QueryRecordsTool::definition(),
    ]
}
