//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is built once at startup from [`definitions::all`] and is
//! read-only afterwards, so concurrent calls share it without locking. Both
//! the rmcp router and the HTTP endpoints dispatch through [`ToolRegistry::call_tool`].

use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::definitions;
use super::error::ToolError;
use super::handlers::ToolDefinition;
use crate::dataverse::PowerPlatformService;

/// Tool registry - maps tool names to their definitions.
pub struct ToolRegistry {
    service: Arc<dyn PowerPlatformService>,
    tools: BTreeMap<&'static str, ToolDefinition>,
}

impl ToolRegistry {
    /// Create a registry holding every tool, backed by `service`.
    pub fn new(service: Arc<dyn PowerPlatformService>) -> Self {
        Self::with_definitions(service, definitions::all())
    }

    /// Create a registry from an explicit set of definitions.
    pub fn with_definitions(
        service: Arc<dyn PowerPlatformService>,
        definitions: impl IntoIterator<Item = ToolDefinition>,
    ) -> Self {
        let mut tools = BTreeMap::new();
        for definition in definitions {
            if let Some(previous) = tools.insert(definition.name(), definition) {
                warn!("Duplicate tool definition replaced: {}", previous.name());
            }
        }
        Self { service, tools }
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Look up a definition by exact name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Iterate over all definitions.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    /// Service every handler runs against.
    pub fn service(&self) -> &Arc<dyn PowerPlatformService> {
        &self.service
    }

    /// Protocol metadata of every tool.
    pub fn tools(&self) -> Vec<Tool> {
        self.definitions().map(|d| d.tool().clone()).collect()
    }

    /// Dispatch a tool call.
    ///
    /// `arguments` must be a JSON object (`null` counts as `{}`) matching the
    /// tool's parameter shape; otherwise the handler is not run.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ToolError> {
        let Some(definition) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        let arguments = into_arguments(arguments)?;
        debug!("Dispatching tool call: {}", name);

        definition.invoke(self.service.clone(), arguments).await
    }
}

/// Normalize a raw parameter bag into an argument object.
fn into_arguments(arguments: Value) -> Result<JsonObject, ToolError> {
    match arguments {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(JsonObject::new()),
        other => Err(ToolError::invalid_arguments(format!(
            "parameters must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataverse::stub::StubService;
    use rmcp::model::RawContent;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const ALL_TOOLS: [&str; 8] = [
        "use-powerplatform-prompt",
        "get-entity-metadata",
        "get-entity-attributes",
        "get-entity-attribute",
        "get-entity-relationships",
        "get-global-option-set",
        "get-record",
        "query-records",
    ];

    fn registry_with(stub: Arc<StubService>) -> ToolRegistry {
        ToolRegistry::new(stub)
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = registry_with(Arc::new(StubService::healthy()));
        let names = registry.tool_names();
        assert_eq!(names.len(), ALL_TOOLS.len());
        for tool in ALL_TOOLS {
            assert!(names.contains(&tool), "missing {tool}");
        }
    }

    #[test]
    fn test_tool_metadata_fidelity() {
        let registry = registry_with(Arc::new(StubService::healthy()));
        let tool = registry.get("query-records").unwrap().tool();
        assert_eq!(tool.name, "query-records");
        assert_eq!(
            tool.description.as_deref(),
            Some("Query Dataverse records with OData filter")
        );

        let properties = tool.input_schema.get("properties").unwrap();
        assert!(properties.get("entityNamePlural").is_some());
        assert!(properties.get("filter").is_some());
        assert!(properties.get("maxRecords").is_some());

        let required = tool.input_schema.get("required").unwrap().as_array().unwrap();
        assert!(required.contains(&json!("filter")));
        assert!(!required.contains(&json!("maxRecords")));
    }

    #[test]
    fn test_prompt_type_schema_is_enum() {
        let registry = registry_with(Arc::new(StubService::healthy()));
        let tool = registry.get("use-powerplatform-prompt").unwrap().tool();
        let schema = serde_json::to_string(&tool.input_schema).unwrap();
        assert!(schema.contains("ENTITY_OVERVIEW"));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let registry = registry_with(Arc::new(StubService::healthy()));
        assert!(registry.get("get-record").is_some());
        assert!(registry.get("Get-Record").is_none());
        assert!(registry.get("get-record ").is_none());
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let stub = Arc::new(StubService::healthy());
        let registry = registry_with(stub.clone());
        let result = registry.call_tool("nonexistent-tool", json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_service() {
        let stub = Arc::new(StubService::healthy());
        let registry = registry_with(stub.clone());

        let missing = registry.call_tool("get-record", json!({ "entityNamePlural": "accounts" })).await;
        assert!(matches!(missing, Err(ToolError::InvalidArguments(_))));

        let wrong_type = registry.call_tool("get-entity-metadata", json!({ "entityName": 42 })).await;
        assert!(matches!(wrong_type, Err(ToolError::InvalidArguments(_))));

        let not_object = registry.call_tool("get-entity-metadata", json!(["account"])).await;
        assert!(matches!(not_object, Err(ToolError::InvalidArguments(_))));

        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_json_tools_round_trip_service_values() {
        let stub = Arc::new(StubService::healthy());
        let registry = registry_with(stub.clone());
        let relationships = serde_json::to_value(&stub.relationships).unwrap();

        let cases = [
            ("get-entity-metadata", json!({ "entityName": "account" }), stub.metadata.clone()),
            ("get-entity-attributes", json!({ "entityName": "account" }), stub.attributes.clone()),
            (
                "get-entity-attribute",
                json!({ "entityName": "account", "attributeName": "name" }),
                stub.attribute.clone(),
            ),
            ("get-entity-relationships", json!({ "entityName": "account" }), relationships),
            ("get-global-option-set", json!({ "optionSetName": "budgetstatus" }), stub.option_set.clone()),
            (
                "get-record",
                json!({ "entityNamePlural": "accounts", "recordId": "00000000-0000-0000-0000-000000000001" }),
                stub.record.clone(),
            ),
            (
                "query-records",
                json!({ "entityNamePlural": "accounts", "filter": "statecode eq 0" }),
                stub.records.clone(),
            ),
        ];

        for (name, arguments, expected) in cases {
            let result = assert_ok!(registry.call_tool(name, arguments).await);
            assert_eq!(result.content.len(), 1, "{name}");
            let parsed: Value = serde_json::from_str(&text_of(&result)).unwrap();
            assert_eq!(parsed, expected, "{name}");
        }
    }

    #[tokio::test]
    async fn test_query_records_default_is_exactly_50() {
        let stub = Arc::new(StubService::healthy());
        let registry = registry_with(stub.clone());

        let without = registry
            .call_tool("query-records", json!({ "entityNamePlural": "accounts", "filter": "x" }))
            .await
            .unwrap();
        let with = registry
            .call_tool(
                "query-records",
                json!({ "entityNamePlural": "accounts", "filter": "x", "maxRecords": 50 }),
            )
            .await
            .unwrap();

        assert_eq!(text_of(&without), text_of(&with));
        assert_eq!(
            stub.calls(),
            vec!["query_records(accounts, x, 50)", "query_records(accounts, x, 50)"]
        );
    }

    #[tokio::test]
    async fn test_service_failure_propagates_for_every_tool() {
        let stub = Arc::new(StubService::failing("upstream exploded"));
        let registry = registry_with(stub.clone());
        let expected = stub.failure_error().unwrap().to_string();

        let arguments = json!({
            "promptType": "ENTITY_OVERVIEW",
            "entityName": "account",
            "attributeName": "name",
            "optionSetName": "budgetstatus",
            "entityNamePlural": "accounts",
            "recordId": "1",
            "filter": "x"
        });

        for name in ALL_TOOLS {
            let err = assert_err!(registry.call_tool(name, arguments.clone()).await);
            assert!(matches!(err, ToolError::Service(_)), "{name}");
            assert_eq!(err.to_string(), expected, "{name}");
        }
    }
}
