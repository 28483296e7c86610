//! # fast-sfdc-tooling
//!
//! Tooling API access for the compile workflows: sObject create, update,
//! delete and query over `MetadataContainer`, `*Member` records,
//! `ContainerAsyncRequest`, and the Aura / Lightning web component bundle
//! records.

mod client;
mod error;
mod types;

pub use client::ToolingClient;
pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use fast_sfdc_client::QueryResult;
