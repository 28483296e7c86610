//! # fast-sfdc-client
//!
//! HTTP transport shared by every Salesforce API surface in the workspace.
//!
//! - One pooled `reqwest` client, gzip/deflate aware
//! - Closed error taxonomy with a [`FailureClass`] per error
//! - Request/response tracing
//! - Escaping and validation helpers in [`security`]
//! - SOAP response reading in [`xml`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │         fast-sfdc-tooling / fast-sfdc-metadata / auth       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Binds the transport to one session                       │
//! │  - Typed JSON helpers, Tooling/Metadata/Apex URLs           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP, no retries                                     │
//! │  - Status to ErrorKind mapping                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use fast_sfdc_client::{SalesforceClient, SfHttpClient, ClientConfig};
//!
//! let http = SfHttpClient::new(ClientConfig::default())?;
//! let client = SalesforceClient::from_http(http, instance_url, session_id)
//!     .with_api_version("45.0");
//!
//! let classes: QueryResult<serde_json::Value> = client
//!     .tooling_query("SELECT Id, Name FROM ApexClass")
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
pub mod security;
pub mod xml;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, FailureClass, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::{sanitize_error_message, Response, ResponseExt};
pub use salesforce_client::{QueryResult, SalesforceClient};

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "45.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("fast-sfdc/", env!("CARGO_PKG_VERSION"));
