//! Dataverse Web API client.
//!
//! Read-only HTTP client for the Dataverse Web API (v9.2), authenticated with
//! Azure AD client credentials.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use super::auth::AzureAdAuth;
use super::error::{DataverseError, DataverseResult};
use super::service::{EntityRelationships, PowerPlatformService};
use crate::core::config::DataverseConfig;

/// Web API version segment appended to the organization URL.
const API_PATH: &str = "api/data/v9.2";

/// Dataverse client implementing [`PowerPlatformService`].
#[derive(Debug)]
pub struct DataverseClient {
    auth: AzureAdAuth,
    organization_url: String,
    http_client: Client,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl DataverseClient {
    /// Create a client from an explicit configuration value.
    pub fn new(config: &DataverseConfig) -> DataverseResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let organization_url = config.organization_url.trim_end_matches('/').to_string();

        let mut auth = AzureAdAuth::new(
            http_client.clone(),
            config.tenant_id.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
            &organization_url,
        );
        if let Some(host) = &config.authority_host {
            auth = auth.with_authority_host(host.clone());
        }

        Ok(Self {
            auth,
            organization_url,
            http_client,
            max_retries: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Full URL for a Web API path (which may carry a query string).
    fn url(&self, path: &str) -> DataverseResult<String> {
        if self.organization_url.is_empty() {
            return Err(DataverseError::Config(
                "Dataverse organization URL is not configured".to_string(),
            ));
        }
        Ok(format!("{}/{}/{}", self.organization_url, API_PATH, path))
    }

    /// GET a Web API path and decode the JSON body.
    async fn get_json(&self, path: &str) -> DataverseResult<Value> {
        let url = self.url(path)?;
        debug!("Fetching: {}", url);

        let token = self.auth.get_token().await?;
        let response = match self.execute_with_retry(&url, &token).await {
            // A revoked token stays cached until expiry; fetch a new one once.
            Err(DataverseError::Api { status: 401, .. }) => {
                warn!("Access token rejected (401), re-authenticating");
                self.auth.clear_cache().await;
                let token = self.auth.get_token().await?;
                self.execute_with_retry(&url, &token).await?
            }
            result => result?,
        };

        response
            .json()
            .await
            .map_err(|e| DataverseError::parse(format!("Failed to parse response: {}", e)))
    }

    /// Execute a GET, retrying throttled and server-side failures.
    async fn execute_with_retry(&self, url: &str, token: &str) -> DataverseResult<Response> {
        let mut attempt = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempt += 1;

            let response = self
                .http_client
                .get(url)
                .bearer_auth(token)
                .header("Accept", "application/json")
                .header("OData-MaxVersion", "4.0")
                .header("OData-Version", "4.0")
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok());

                    if attempt >= self.max_retries {
                        return Err(DataverseError::RateLimited(
                            retry_after.unwrap_or(delay.div_ceil(1000)),
                        ));
                    }

                    warn!(
                        "Rate limited (429), attempt {}/{}, retrying",
                        attempt, self.max_retries
                    );
                    let wait = retry_after.map_or(Duration::from_millis(delay), Duration::from_secs);
                    sleep(wait).await;
                    delay *= 2;
                }
                StatusCode::NOT_FOUND => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(DataverseError::not_found(error_message(status, &body)));
                }
                status if status.is_server_error() && attempt < self.max_retries => {
                    warn!(
                        "Server error ({}), attempt {}/{}, retrying",
                        status, attempt, self.max_retries
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay *= 2;
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(DataverseError::api(
                        status.as_u16(),
                        error_message(status, &body),
                    ));
                }
            }
        }
    }
}

#[async_trait]
impl PowerPlatformService for DataverseClient {
    #[instrument(skip(self))]
    async fn get_entity_metadata(&self, entity_name: &str) -> DataverseResult<Value> {
        let mut metadata = self.get_json(&entity_definition_path(entity_name)).await?;

        // Privileges bloats the payload and is not useful to callers.
        if let Some(object) = metadata.as_object_mut() {
            object.shift_remove("Privileges");
        }

        Ok(metadata)
    }

    #[instrument(skip(self))]
    async fn get_entity_attributes(&self, entity_name: &str) -> DataverseResult<Value> {
        let query = encode_query(&[("$select", "LogicalName"), ("$filter", "AttributeOf eq null")]);
        let path = format!("{}/Attributes?{}", entity_definition_path(entity_name), query);

        let mut attributes = self.get_json(&path).await?;

        // Yomi (phonetic) companion columns are noise for schema exploration.
        if let Some(values) = attributes.get_mut("value").and_then(Value::as_array_mut) {
            values.retain(|attribute| {
                attribute
                    .get("LogicalName")
                    .and_then(Value::as_str)
                    .is_none_or(|name| !name.contains("yomi"))
            });
        }

        Ok(attributes)
    }

    #[instrument(skip(self))]
    async fn get_entity_attribute(
        &self,
        entity_name: &str,
        attribute_name: &str,
    ) -> DataverseResult<Value> {
        let path = format!(
            "{}/Attributes(LogicalName='{}')",
            entity_definition_path(entity_name),
            odata_literal(attribute_name)
        );
        self.get_json(&path).await
    }

    #[instrument(skip(self))]
    async fn get_entity_relationships(
        &self,
        entity_name: &str,
    ) -> DataverseResult<EntityRelationships> {
        let base = entity_definition_path(entity_name);
        let one_to_many_path = format!("{}/OneToManyRelationships", base);
        let many_to_many_path = format!("{}/ManyToManyRelationships", base);

        let (one_to_many, many_to_many) = futures::try_join!(
            self.get_json(&one_to_many_path),
            self.get_json(&many_to_many_path)
        )?;

        Ok(EntityRelationships {
            one_to_many,
            many_to_many,
        })
    }

    #[instrument(skip(self))]
    async fn get_global_option_set(&self, option_set_name: &str) -> DataverseResult<Value> {
        let path = format!(
            "GlobalOptionSetDefinitions(Name='{}')",
            odata_literal(option_set_name)
        );
        self.get_json(&path).await
    }

    #[instrument(skip(self))]
    async fn get_record(
        &self,
        entity_name_plural: &str,
        record_id: &str,
    ) -> DataverseResult<Value> {
        let path = format!("{}({})", entity_name_plural, record_id);
        self.get_json(&path).await
    }

    #[instrument(skip(self))]
    async fn query_records(
        &self,
        entity_name_plural: &str,
        filter: &str,
        max_records: u32,
    ) -> DataverseResult<Value> {
        let top = max_records.to_string();
        let query = encode_query(&[("$filter", filter), ("$top", top.as_str())]);
        let path = format!("{}?{}", entity_name_plural, query);
        self.get_json(&path).await
    }
}

/// Path of an entity definition addressed by logical name.
fn entity_definition_path(entity_name: &str) -> String {
    format!("EntityDefinitions(LogicalName='{}')", odata_literal(entity_name))
}

/// Escape a value for use inside an OData single-quoted string literal.
fn odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// URL-encode OData system query options.
fn encode_query(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap_or_default()
}

/// Extract a readable message from a Dataverse error body.
///
/// Dataverse wraps failures as `{"error": {"code": ..., "message": ...}}`.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_envelope = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    match from_envelope {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}
