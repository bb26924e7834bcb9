//! Predefined prompt tool.
//!
//! Unlike the JSON tools, this one composes several service calls into a
//! fixed markdown template.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::dataverse::{EntityRelationships, PowerPlatformService};
use crate::domains::tools::definitions::common::text_result;
use crate::domains::tools::{ToolDefinition, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Prompts this tool can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PromptType {
    /// Summary of an entity's schema, key attributes and relationship counts.
    #[serde(rename = "ENTITY_OVERVIEW")]
    EntityOverview,
}

/// Parameters for the prompt tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsePromptParams {
    /// Which predefined prompt to render.
    pub prompt_type: PromptType,

    /// Logical name of the entity (e.g. "account").
    pub entity_name: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Predefined prompt tool.
pub struct UsePowerPlatformPromptTool;

impl UsePowerPlatformPromptTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "use-powerplatform-prompt";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Use a predefined prompt for entity overview";

    #[instrument(skip_all, fields(prompt = ?params.prompt_type, entity = %params.entity_name))]
    pub async fn execute(
        service: &dyn PowerPlatformService,
        params: UsePromptParams,
    ) -> Result<CallToolResult, ToolError> {
        match params.prompt_type {
            PromptType::EntityOverview => {
                let entity_name = params.entity_name.as_str();
                let (metadata, attributes, relationships) = futures::try_join!(
                    service.get_entity_metadata(entity_name),
                    service.get_entity_attributes(entity_name),
                    service.get_entity_relationships(entity_name)
                )?;

                info!("Rendering entity overview");
                Ok(text_result(render_entity_overview(
                    entity_name,
                    &metadata,
                    &attributes,
                    &relationships,
                )))
            }
        }
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            |service, params: UsePromptParams| async move {
                Self::execute(&*service, params).await
            },
        )
    }
}

/// Render the entity overview markdown.
///
/// A missing display label falls back to the entity name and a missing
/// description to `N/A`; other absent scalars render empty.
pub fn render_entity_overview(
    entity_name: &str,
    metadata: &Value,
    attributes: &Value,
    relationships: &EntityRelationships,
) -> String {
    let display_name = localized_label(metadata, "DisplayName").unwrap_or(entity_name);
    let description = localized_label(metadata, "Description").unwrap_or("N/A");

    let attribute_lines = attributes
        .get("value")
        .and_then(Value::as_array)
        .map(|attrs| {
            attrs
                .iter()
                .map(|attr| format!("- {}", string_field(attr, "LogicalName")))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    format!(
        "## Power Platform Entity: {entity_name}

### Entity Details
- Display Name: {display_name}
- Schema Name: {schema_name}
- Description: {description}
- Primary Key: {primary_key}
- Primary Name: {primary_name}

### Key Attributes
{attribute_lines}

### Relationships
- One-to-Many Relationships: {one_to_many}
- Many-to-Many Relationships: {many_to_many}",
        schema_name = string_field(metadata, "SchemaName"),
        primary_key = string_field(metadata, "PrimaryIdAttribute"),
        primary_name = string_field(metadata, "PrimaryNameAttribute"),
        one_to_many = relationships.one_to_many_count(),
        many_to_many = relationships.many_to_many_count(),
    )
}

/// `<field>.UserLocalizedLabel.Label`, if present and non-empty.
fn localized_label<'a>(metadata: &'a Value, field: &str) -> Option<&'a str> {
    metadata
        .get(field)?
        .get("UserLocalizedLabel")?
        .get("Label")?
        .as_str()
        .filter(|label| !label.is_empty())
}

fn string_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value.get(field).and_then(Value::as_str).unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataverse::stub::StubService;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_prompt_type_wire_name() {
        let json = r#"{"promptType": "ENTITY_OVERVIEW", "entityName": "account"}"#;
        let params: UsePromptParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.prompt_type, PromptType::EntityOverview);
    }

    #[test]
    fn test_unknown_prompt_type_rejected() {
        let json = r#"{"promptType": "SUMMARY", "entityName": "account"}"#;
        assert!(serde_json::from_str::<UsePromptParams>(json).is_err());
    }

    #[tokio::test]
    async fn test_entity_overview_full_template() {
        let stub = StubService::healthy();
        let params = UsePromptParams {
            prompt_type: PromptType::EntityOverview,
            entity_name: "account".to_string(),
        };

        let result = UsePowerPlatformPromptTool::execute(&stub, params)
            .await
            .unwrap();

        let expected = "## Power Platform Entity: account

### Entity Details
- Display Name: Account
- Schema Name: Account
- Description: Business that represents a customer.
- Primary Key: accountid
- Primary Name: name

### Key Attributes
- accountid
- name
- telephone1

### Relationships
- One-to-Many Relationships: 2
- Many-to-Many Relationships: 1";
        assert_eq!(text_of(&result), expected);
        assert_eq!(result.content.len(), 1);
    }

    #[tokio::test]
    async fn test_entity_overview_makes_three_service_calls() {
        let stub = StubService::healthy();
        let params = UsePromptParams {
            prompt_type: PromptType::EntityOverview,
            entity_name: "contact".to_string(),
        };

        UsePowerPlatformPromptTool::execute(&stub, params)
            .await
            .unwrap();

        let mut calls = stub.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                "get_entity_attributes(contact)",
                "get_entity_metadata(contact)",
                "get_entity_relationships(contact)",
            ]
        );
    }

    #[test]
    fn test_missing_label_and_description_fallbacks() {
        let metadata = json!({
            "SchemaName": "new_widget",
            "DisplayName": { "UserLocalizedLabel": null },
            "PrimaryIdAttribute": "new_widgetid",
            "PrimaryNameAttribute": "new_name"
        });
        let relationships = EntityRelationships {
            one_to_many: json!({ "value": [] }),
            many_to_many: json!({ "value": [] }),
        };

        let text = render_entity_overview(
            "new_widget",
            &metadata,
            &json!({ "value": [] }),
            &relationships,
        );

        assert!(text.contains("- Display Name: new_widget\n"));
        assert!(text.contains("- Description: N/A\n"));
        assert!(text.contains("- One-to-Many Relationships: 0"));
    }

    #[test]
    fn test_empty_label_falls_back() {
        let metadata = json!({
            "DisplayName": { "UserLocalizedLabel": { "Label": "" } },
            "Description": { "UserLocalizedLabel": { "Label": "" } }
        });
        let relationships = EntityRelationships {
            one_to_many: json!({}),
            many_to_many: json!({}),
        };

        let text = render_entity_overview("lead", &metadata, &json!({}), &relationships);

        assert!(text.contains("- Display Name: lead\n"));
        assert!(text.contains("- Description: N/A\n"));
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let stub = StubService::failing("Entity 'nope' does not exist");
        let params = UsePromptParams {
            prompt_type: PromptType::EntityOverview,
            entity_name: "nope".to_string(),
        };

        let err = UsePowerPlatformPromptTool::execute(&stub, params)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Not found: Entity 'nope' does not exist");
    }
}
