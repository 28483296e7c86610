//! # fast-sfdc-metadata
//!
//! SOAP access to the Metadata and Apex services.
//!
//! - **Retrieve** - unpackaged retrieve from a `package.xml` manifest
//! - **Deploy** - base64 zip deploy with status checks
//! - **Describe** - metadata types with their directories and suffixes
//! - **Anonymous Apex** - `executeAnonymous` with the captured debug log
//!
//! Every call goes through [`MetadataClient::call`], which classifies HTTP
//! 401/403 and `INVALID_SESSION_ID` faults as [`ErrorKind::Unauthorized`].
//! Polling and session renewal live in the connector crate.

mod apex;
mod client;
mod deploy;
mod describe;
mod error;
mod retrieve;
pub mod soap;
mod types;

pub use apex::{AnonymousExecution, ExecuteAnonymousResult};
pub use client::MetadataClient;
pub use deploy::{ComponentFailure, DeployOptions, DeployResult, DeployStatus};
pub use describe::{DescribeMetadataResult, MetadataType};
pub use error::{Error, ErrorKind, Result};
pub use retrieve::{PackageManifest, PackageTypeMembers, RetrieveMessage, RetrieveResult, RetrieveStatus};
pub use soap::{DebuggingHeader, LogCategory, SoapResponse, SoapService};
pub use types::{ComponentSuccess, FileProperties, TestFailure, TestLevel};
