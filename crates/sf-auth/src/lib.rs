//! # fast-sfdc-auth
//!
//! Connection configuration and session establishment for fast-sfdc.
//!
//! ## Security
//!
//! - Passwords and session ids are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Server fault messages are sanitized before they reach an error
//!
//! ## Example
//!
//! ```rust,ignore
//! use fast_sfdc_auth::{ConnectionConfig, SoapLogin};
//! use fast_sfdc_client::SfHttpClient;
//!
//! let config = ConnectionConfig::from_file(".vscode/fastsfdc.json")?;
//! let login = SoapLogin::new(SfHttpClient::default_client()?);
//! let session = login.login(&config).await?;
//! println!("logged in to {}", session.instance_url());
//! ```

mod config;
mod credentials;
mod error;
mod login;

pub use config::{ConnectionConfig, CredentialProfile, DEFAULT_API_VERSION, PRODUCTION_LOGIN_URL};
pub use credentials::{Credentials, Session};
pub use error::{Error, ErrorKind, Result};
pub use login::{instance_url_from_server_url, login_envelope, login_url, parse_login_response, SoapLogin};
