//! # fast-sfdc
//!
//! Salesforce access for editor tooling. One [`Connector`] per org logs in
//! with a username and password, renews its session when the server rejects
//! it, and drives the long-running Tooling and Metadata jobs an editor needs:
//! compiling a component, creating one from a template, retrieving and
//! deploying metadata.
//!
//! ## Crates
//!
//! - **fast-sfdc-client** - HTTP transport, pooling, error classification
//! - **fast-sfdc-auth** - connection profiles and SOAP login
//! - **fast-sfdc-tooling** - Tooling API records, CRUD and queries
//! - **fast-sfdc-metadata** - Metadata and Apex SOAP services
//! - **fast-sfdc-connector** - session state, dispatcher, job poller, domain operations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fast_sfdc::{ConnectionConfig, Connector, MetadataKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::from_file(".vscode/fastsfdc.json")?;
//!     let connector = Connector::new(config)?;
//!
//!     let created = connector
//!         .create_metadata(MetadataKind::ApexClass, "AccountService", None)
//!         .await?;
//!     println!("created {}", created.relative_path());
//!     Ok(())
//! }
//! ```

pub use fast_sfdc_auth as auth;
pub use fast_sfdc_client as client;
pub use fast_sfdc_connector as connector;
pub use fast_sfdc_metadata as metadata;
pub use fast_sfdc_tooling as tooling;

pub use fast_sfdc_auth::{ConnectionConfig, CredentialProfile, Credentials, Session};
pub use fast_sfdc_client::ClientConfig;
pub use fast_sfdc_connector::{
    CancellationToken, Connector, CreatedComponent, Error, ErrorKind, JobHandle, JobKind,
    MetadataKind, PollCadence, PollOptions, PollSettings, Protocol, Result,
};
