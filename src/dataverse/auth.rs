//! Azure AD authentication for the Dataverse Web API.
//!
//! Implements the OAuth2 client-credentials flow (app-only access) and keeps
//! the most recent token cached until shortly before it expires.

use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::error::AuthError;

/// Default Microsoft identity platform host.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Tokens are refreshed this long before their advertised expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Token response from Azure AD.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Cached token with expiry tracking.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        self.expires_at > Instant::now() + EXPIRY_MARGIN
    }
}

/// Client-credentials token provider scoped to one Dataverse organization.
#[derive(Debug)]
pub struct AzureAdAuth {
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    http_client: Client,
    token_cache: RwLock<Option<CachedToken>>,
}

impl AzureAdAuth {
    /// Create a token provider for the given organization URL.
    pub fn new(
        http_client: Client,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        organization_url: &str,
    ) -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scope_for(organization_url),
            http_client,
            token_cache: RwLock::new(None),
        }
    }

    /// Override the identity platform host (sovereign clouds, tests).
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Token endpoint URL for this tenant.
    fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }

    /// Return a cached access token, or acquire a fresh one.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|t| t.is_valid()) {
                debug!("Using cached token");
                return Ok(cached.access_token.clone());
            }
        }

        info!("Acquiring new access token for scope: {}", self.scope);
        self.acquire_token().await
    }

    async fn acquire_token(&self) -> Result<String, AuthError> {
        if self.tenant_id.is_empty() || self.client_id.is_empty() || self.client_secret.is_empty()
        {
            return Err(AuthError::MissingCredentials(
                "tenant id, client id and client secret are required".to_string(),
            ));
        }

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http_client
            .post(self.token_endpoint())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Token request failed: {} - {}", status, body);
            return Err(AuthError::TokenRequestFailed(format!(
                "Status: {}, Body: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ParseError(format!("Failed to parse token response: {}", e)))?;

        *self.token_cache.write().await = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        info!("Token acquired, expires in {} seconds", token.expires_in);

        Ok(token.access_token)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub async fn clear_cache(&self) {
        *self.token_cache.write().await = None;
    }
}

/// Build the `.default` scope for an organization URL.
fn scope_for(organization_url: &str) -> String {
    format!("{}/.default", organization_url.trim_end_matches('/'))
}
