//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally via a `.env` file) or defaults. The
//! configuration is built once at startup and never mutated afterwards.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Dataverse connection settings.
    pub dataverse: DataverseConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Dataverse organization and app registration settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct DataverseConfig {
    /// Organization URL, e.g. `https://contoso.crm.dynamics.com`.
    pub organization_url: String,

    /// Azure AD application (client) id.
    pub client_id: String,

    /// Azure AD client secret.
    #[serde(default, skip_serializing)]
    pub client_secret: String,

    /// Azure AD tenant id.
    pub tenant_id: String,

    /// Identity platform host override; defaults to the public cloud.
    pub authority_host: Option<String>,

    /// Attempts for throttled (429) and server-error responses.
    pub max_retries: u32,

    /// Initial backoff between attempts, doubled on each retry.
    pub retry_delay_ms: u64,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for DataverseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataverseConfig")
            .field("organization_url", &self.organization_url)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &(!self.client_secret.is_empty()).then_some("[REDACTED]"),
            )
            .field("tenant_id", &self.tenant_id)
            .field("authority_host", &self.authority_host)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for DataverseConfig {
    fn default() -> Self {
        Self {
            organization_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            tenant_id: String::new(),
            authority_host: None,
            max_retries: 3,
            retry_delay_ms: 1000,
            timeout_secs: 60,
        }
    }
}

impl DataverseConfig {
    /// Names of required settings that are still empty.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        [
            ("POWERPLATFORM_URL", &self.organization_url),
            ("POWERPLATFORM_CLIENT_ID", &self.client_id),
            ("POWERPLATFORM_CLIENT_SECRET", &self.client_secret),
            ("POWERPLATFORM_TENANT_ID", &self.tenant_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("POWERPLATFORM_URL") {
            config.organization_url = url;
        }
        if let Ok(client_id) = std::env::var("POWERPLATFORM_CLIENT_ID") {
            config.client_id = client_id;
        }
        if let Ok(secret) = std::env::var("POWERPLATFORM_CLIENT_SECRET") {
            config.client_secret = secret;
        }
        if let Ok(tenant_id) = std::env::var("POWERPLATFORM_TENANT_ID") {
            config.tenant_id = tenant_id;
        }
        if let Ok(host) = std::env::var("POWERPLATFORM_AUTHORITY_HOST") {
            config.authority_host = Some(host);
        }
        if let Some(retries) = std::env::var("POWERPLATFORM_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.max_retries = retries;
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "powerplatform-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            dataverse: DataverseConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...). Dataverse settings use the
    /// `POWERPLATFORM_` prefix. The HTTP port honours the conventional `PORT`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.dataverse = DataverseConfig::from_env();

        config
    }

    /// Log warnings for incomplete settings.
    ///
    /// Called after logging is initialised; a partially configured server
    /// still starts, and tool calls report the problem.
    pub fn log_warnings(&self) {
        let missing = self.dataverse.missing_settings();
        if missing.is_empty() {
            info!(
                "Dataverse organization: {}",
                self.dataverse.organization_url
            );
        } else {
            warn!(
                "Dataverse settings missing: {}. Tool calls will fail until they are set.",
                missing.join(", ")
            );
        }
    }
}
