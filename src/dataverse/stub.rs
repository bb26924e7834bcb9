//! In-memory [`PowerPlatformService`] used by the dispatch tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

use super::error::{DataverseError, DataverseResult};
use super::service::{EntityRelationships, PowerPlatformService};

/// Canned responses plus a log of every call made.
pub struct StubService {
    pub metadata: Value,
    pub attributes: Value,
    pub attribute: Value,
    pub relationships: EntityRelationships,
    pub option_set: Value,
    pub record: Value,
    pub records: Value,
    failure: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl StubService {
    /// A stub answering every operation with sample account data.
    pub fn healthy() -> Self {
        Self {
            metadata: json!({
                "LogicalName": "account",
                "SchemaName": "Account",
                "DisplayName": { "UserLocalizedLabel": { "Label": "Account" } },
                "Description": { "UserLocalizedLabel": { "Label": "Business that represents a customer." } },
                "PrimaryIdAttribute": "accountid",
                "PrimaryNameAttribute": "name"
            }),
            attributes: json!({
                "value": [
                    { "LogicalName": "accountid" },
                    { "LogicalName": "name" },
                    { "LogicalName": "telephone1" }
                ]
            }),
            attribute: json!({ "LogicalName": "name", "AttributeType": "String", "MaxLength": 160 }),
            relationships: EntityRelationships {
                one_to_many: json!({ "value": [{ "SchemaName": "account_contacts" }, { "SchemaName": "account_tasks" }] }),
                many_to_many: json!({ "value": [{ "SchemaName": "accountleads_association" }] }),
            },
            option_set: json!({ "Name": "budgetstatus", "Options": [{ "Value": 0 }, { "Value": 1 }] }),
            record: json!({ "accountid": "...", "name": "Contoso" }),
            records: json!({ "value": [{ "name": "Contoso" }, { "name": "Fabrikam" }] }),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A stub whose every operation fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::healthy()
        }
    }

    /// The error every operation of a failing stub returns.
    pub fn failure_error(&self) -> Option<DataverseError> {
        self.failure.clone().map(DataverseError::not_found)
    }

    /// Calls made so far, as `operation(arg, ...)` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<T: Clone>(&self, call: String, value: &T) -> DataverseResult<T> {
        self.calls.lock().unwrap().push(call);
        match self.failure_error() {
            Some(err) => Err(err),
            None => Ok(value.clone()),
        }
    }
}

#[async_trait]
impl PowerPlatformService for StubService {
    async fn get_entity_metadata(&self, entity_name: &str) -> DataverseResult<Value> {
        self.answer(format!("get_entity_metadata({entity_name})"), &self.metadata)
    }

    async fn get_entity_attributes(&self, entity_name: &str) -> DataverseResult<Value> {
        self.answer(format!("get_entity_attributes({entity_name})"), &self.attributes)
    }

    async fn get_entity_attribute(
        &self,
        entity_name: &str,
        attribute_name: &str,
    ) -> DataverseResult<Value> {
        self.answer(
            format!("get_entity_attribute({entity_name}, {attribute_name})"),
            &self.attribute,
        )
    }

    async fn get_entity_relationships(
        &self,
        entity_name: &str,
    ) -> DataverseResult<EntityRelationships> {
        self.answer(
            format!("get_entity_relationships({entity_name})"),
            &self.relationships,
        )
    }

    async fn get_global_option_set(&self, option_set_name: &str) -> DataverseResult<Value> {
        self.answer(
            format!("get_global_option_set({option_set_name})"),
            &self.option_set,
        )
    }

    async fn get_record(
        &self,
        entity_name_plural: &str,
        record_id: &str,
    ) -> DataverseResult<Value> {
        self.answer(
            format!("get_record({entity_name_plural}, {record_id})"),
            &self.record,
        )
    }

    async fn query_records(
        &self,
        entity_name_plural: &str,
        filter: &str,
        max_records: u32,
    ) -> DataverseResult<Value> {
        self.answer(
            format!("query_records({entity_name_plural}, {filter}, {max_records})"),
            &self.records,
        )
    }
}
