//! Type-erased tool definitions.
//!
//! A [`ToolDefinition`] couples the protocol-visible metadata of a tool (name,
//! description, JSON schema of its parameters) with a handler that first
//! deserializes raw arguments into the tool's typed params struct and only
//! then runs the tool. Both transports dispatch through it, so the parameter
//! shape is checked the same way on every path.

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::{fmt, future::Future, sync::Arc};

use super::error::ToolError;
use crate::dataverse::PowerPlatformService;

/// Future returned by a tool handler.
pub type ToolFuture = BoxFuture<'static, Result<CallToolResult, ToolError>>;

type ToolHandlerFn =
    Arc<dyn Fn(Arc<dyn PowerPlatformService>, JsonObject) -> ToolFuture + Send + Sync>;

/// One entry of the tool table.
#[derive(Clone)]
pub struct ToolDefinition {
    name: &'static str,
    description: &'static str,
    tool: Tool,
    handler: ToolHandlerFn,
}

impl ToolDefinition {
    /// Define a tool whose arguments deserialize into `P`.
    ///
    /// The input schema advertised to protocol clients is generated from `P`,
    /// and the same type gates every invocation.
    pub fn new<P, F, Fut>(name: &'static str, description: &'static str, execute: F) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(Arc<dyn PowerPlatformService>, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, ToolError>> + Send + 'static,
    {
        let tool = Tool {
            name: name.into(),
            description: Some(description.into()),
            input_schema: cached_schema_for_type::<P>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        };

        let handler: ToolHandlerFn = Arc::new(
            move |service: Arc<dyn PowerPlatformService>, arguments: JsonObject| -> ToolFuture {
                match serde_json::from_value::<P>(serde_json::Value::Object(arguments)) {
                    Ok(params) => execute(service, params).boxed(),
                    Err(e) => {
                        futures::future::ready(Err(ToolError::invalid_arguments(e.to_string())))
                            .boxed()
                    }
                }
            },
        );

        Self {
            name,
            description,
            tool,
            handler,
        }
    }

    /// Tool name as registered in MCP.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tool description shown to clients.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Protocol metadata (name, description, input schema).
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Validate `arguments` against the parameter shape and run the tool.
    pub fn invoke(
        &self,
        service: Arc<dyn PowerPlatformService>,
        arguments: JsonObject,
    ) -> ToolFuture {
        (self.handler)(service, arguments)
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
