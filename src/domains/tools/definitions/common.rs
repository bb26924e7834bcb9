//! Helpers shared by the tool definitions.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use crate::domains::tools::ToolError;

/// Wrap pre-rendered text as a single-block success result.
pub fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Render a service value as two-space indented JSON in a single text block.
pub fn json_result<T: Serialize + ?Sized>(value: &T) -> Result<CallToolResult, ToolError> {
    Ok(text_result(serde_json::to_string_pretty(value)?))
}
