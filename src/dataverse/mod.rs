//! Dataverse (Power Platform) service client.
//!
//! - `service`: the [`PowerPlatformService`] trait tool handlers depend on
//! - `client`: Web API implementation of that trait
//! - `auth`: Azure AD client-credentials token acquisition
//! - `error`: client error types

mod auth;
mod client;
mod error;
mod service;

#[cfg(test)]
pub(crate) mod stub;

pub use auth::{AzureAdAuth, DEFAULT_AUTHORITY_HOST};
pub use client::DataverseClient;
pub use error::{AuthError, DataverseError, DataverseResult};
pub use service::{EntityRelationships, PowerPlatformService, collection_len};
