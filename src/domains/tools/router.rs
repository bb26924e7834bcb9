//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every route is derived from a [`ToolRegistry`] entry, so the protocol
//! surface and the HTTP dispatch surface always expose the same tools.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content},
};
use tracing::error;

use super::error::ToolError;
use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .definitions()
        .fold(ToolRouter::new(), |router, definition| {
            let definition = definition.clone();
            let service = registry.service().clone();

            router.with_route(ToolRoute::new_dyn(
                definition.tool().clone(),
                move |ctx: ToolCallContext<'_, S>| {
                    let arguments = ctx.arguments.clone().unwrap_or_default();
                    let call = definition.invoke(service.clone(), arguments);
                    let name = definition.name();
                    async move { into_protocol_result(name, call.await) }.boxed()
                },
            ))
        })
}

/// Map a dispatch outcome onto the protocol.
///
/// Bad arguments and unknown tools are request errors; a failing Dataverse
/// call becomes an `isError` tool result carrying the message.
pub fn into_protocol_result(
    name: &str,
    result: Result<CallToolResult, ToolError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(result) => Ok(result),
        Err(e @ (ToolError::NotFound(_) | ToolError::InvalidArguments(_))) => {
            Err(McpError::invalid_params(e.to_string(), None))
        }
        Err(e) => {
            error!("Error executing tool {}: {}", name, e);
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
    }
}
