//! The Power Platform service seam.
//!
//! Tool handlers only ever talk to [`PowerPlatformService`]; the production
//! implementation is [`super::DataverseClient`], tests substitute stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DataverseResult;

/// Both relationship collections of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelationships {
    pub one_to_many: Value,
    pub many_to_many: Value,
}

impl EntityRelationships {
    /// Number of one-to-many relationships (entries in `oneToMany.value`).
    pub fn one_to_many_count(&self) -> usize {
        collection_len(&self.one_to_many)
    }

    /// Number of many-to-many relationships (entries in `manyToMany.value`).
    pub fn many_to_many_count(&self) -> usize {
        collection_len(&self.many_to_many)
    }
}

/// Length of an OData collection's `value` array, zero when absent.
pub fn collection_len(collection: &Value) -> usize {
    collection
        .get("value")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Read operations against Dataverse.
#[async_trait]
pub trait PowerPlatformService: Send + Sync {
    /// Metadata of one entity definition.
    async fn get_entity_metadata(&self, entity_name: &str) -> DataverseResult<Value>;

    /// Attribute collection of an entity (`{"value": [...]}`).
    async fn get_entity_attributes(&self, entity_name: &str) -> DataverseResult<Value>;

    /// Metadata of a single attribute.
    async fn get_entity_attribute(
        &self,
        entity_name: &str,
        attribute_name: &str,
    ) -> DataverseResult<Value>;

    /// One-to-many and many-to-many relationships of an entity.
    async fn get_entity_relationships(
        &self,
        entity_name: &str,
    ) -> DataverseResult<EntityRelationships>;

    /// A global option set by name.
    async fn get_global_option_set(&self, option_set_name: &str) -> DataverseResult<Value>;

    /// A single record by its identifier.
    async fn get_record(&self, entity_name_plural: &str, record_id: &str)
    -> DataverseResult<Value>;

    /// Records matching an OData filter, at most `max_records` of them.
    async fn query_records(
        &self,
        entity_name_plural: &str,
        filter: &str,
        max_records: u32,
    ) -> DataverseResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relationships_serialize_camel_case() {
        let relationships = EntityRelationships {
            one_to_many: json!({ "value": [] }),
            many_to_many: json!({ "value": [] }),
        };
        let value = serde_json::to_value(&relationships).unwrap();
        assert!(value.get("oneToMany").is_some());
        assert!(value.get("manyToMany").is_some());
    }

    #[test]
    fn test_relationship_counts() {
        let relationships = EntityRelationships {
            one_to_many: json!({ "value": [{}, {}, {}] }),
            many_to_many: json!({}),
        };
        assert_eq!(relationships.one_to_many_count(), 3);
        assert_eq!(relationships.many_to_many_count(), 0);
    }
}
