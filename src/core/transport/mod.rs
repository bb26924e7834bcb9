//! Transport layer for the MCP server.
//!
//! This module provides the transport implementations:
//! - **STDIO**: Standard input/output, served by rmcp - feature: `stdio`
//! - **HTTP**: `POST /invoke` plus JSON-RPC over POST - feature: `http`
//!
//! Each transport handles the connection lifecycle and delegates tool calls
//! to the shared [`crate::domains::tools::ToolRegistry`] through the server.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
