//! # fast-sfdc-connector
//!
//! Authenticated request dispatch and async job polling for a Salesforce
//! org.
//!
//! - Lazy SOAP login, shared by concurrent callers
//! - One retry policy for REST and SOAP: a rejected session is renewed and
//!   the call retried exactly once
//! - Deadline- and cancellation-aware polling for container compiles,
//!   metadata retrieves and deploys
//! - Component creation from starter templates
//!
//! ## Example
//!
//! ```rust,ignore
//! use fast_sfdc_connector::{ConnectionConfig, Connector, MetadataKind};
//!
//! let connector = Connector::new(ConnectionConfig::from_env()?)?;
//! let created = connector
//!     .create_metadata(MetadataKind::ApexClass, "InvoiceService", None)
//!     .await?;
//! println!("created {}", created.relative_path());
//!
//! let handle = connector.retrieve_metadata("src/package.xml").await?;
//! let result = connector
//!     .poll_retrieve_metadata_status(&handle, &connector.child_token())
//!     .await?;
//! ```

mod connector;
mod error;
mod kind;
mod ops;
mod poll;
mod session;

#[cfg(test)]
mod test_support;

pub use connector::{Connector, Protocol};
pub use error::{Error, ErrorKind, Result};
pub use kind::{ComponentMetadata, CreationStrategy, KindSpec, MetadataKind};
pub use ops::CreatedComponent;
pub use poll::{poll_until, JobHandle, JobKind, PollCadence, PollOptions, PollSettings};
pub use session::SessionState;

pub use fast_sfdc_auth::{ConnectionConfig, CredentialProfile, Session};
pub use tokio_util::sync::CancellationToken;
