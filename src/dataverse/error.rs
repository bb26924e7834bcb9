//! Dataverse client error types.

use thiserror::Error;

/// Errors raised while acquiring an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status.
    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    /// Transport failure talking to the token endpoint.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The token response could not be decoded.
    #[error("Token parse error: {0}")]
    ParseError(String),

    /// Tenant, client id or secret is not configured.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

/// Errors raised by Dataverse Web API operations.
///
/// The `Display` text of these errors is what callers of the HTTP invoke
/// endpoint receive verbatim, so messages stay short and self-contained.
#[derive(Debug, Error)]
pub enum DataverseError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dataverse API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited (429): retry after {0} seconds")]
    RateLimited(u64),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataverseError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Result type for Dataverse operations.
pub type DataverseResult<T> = Result<T, DataverseError>;
