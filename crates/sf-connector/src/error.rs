//! Error types for fast-sfdc-connector.
//!
//! The dispatcher decides what to do with a failure by matching on
//! [`ErrorKind`] alone: `Unreachable` stops, `Unauthorized` re-authenticates
//! once, everything else propagates.

use std::time::Duration;

use fast_sfdc_tooling::{ContainerAsyncRequestStatus, DeployMessage};

use crate::poll::JobKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(kind: ErrorKind, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self.kind, ErrorKind::Unreachable)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ErrorKind::Unauthorized(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// DNS or connect failure. Never retried.
    #[error("Unreachable host. Check connection")]
    Unreachable,

    /// The server rejected the session (HTTP 401/403 or `INVALID_SESSION_ID`).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A compile reported component failures; the message is the first
    /// failure's problem text, unchanged.
    #[error("{problem}")]
    ComponentFailure {
        problem: String,
        failures: Vec<DeployMessage>,
    },

    /// A container compile ended in a failure state without component
    /// failures.
    #[error("Job {} ended in state {}{}", .0.id, .0.state, error_suffix(.0))]
    JobFailed(Box<ContainerAsyncRequestStatus>),

    /// Missing or invalid configuration. Raised before any network traffic.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The login was refused or its response was unusable.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("{kind} job {id} did not finish within {after:?}")]
    PollTimedOut {
        kind: JobKind,
        id: String,
        after: Duration,
    },

    #[error("{kind} job {id} polling was cancelled")]
    Cancelled { kind: JobKind, id: String },

    /// A job handle was passed to the poll routine of another job kind.
    #[error("expected a {expected} job, got a {actual} job")]
    InvalidJob { expected: JobKind, actual: JobKind },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Tooling API error: {0}")]
    Tooling(String),

    #[error("Metadata API error: {0}")]
    Metadata(String),

    #[error("Invalid package manifest: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(String),

    /// The HTTP layer failed outside any Tooling or Metadata call.
    #[error("Transport error: {0}")]
    Transport(String),
}

fn error_suffix(status: &ContainerAsyncRequestStatus) -> String {
    match status.error_msg.as_deref() {
        Some(msg) if !msg.is_empty() => format!(": {msg}"),
        _ => String::new(),
    }
}

impl From<fast_sfdc_auth::Error> for Error {
    fn from(err: fast_sfdc_auth::Error) -> Self {
        use fast_sfdc_auth::ErrorKind as AuthKind;

        let kind = match &err.kind {
            AuthKind::Unreachable(_) => ErrorKind::Unreachable,
            AuthKind::Config(msg) => ErrorKind::Config(msg.clone()),
            AuthKind::EnvVar(var) => ErrorKind::Config(format!("environment variable {var} is not set")),
            AuthKind::Json(msg) => ErrorKind::Config(msg.clone()),
            AuthKind::Io(msg) => ErrorKind::Io(msg.clone()),
            _ => ErrorKind::Auth(err.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<fast_sfdc_tooling::Error> for Error {
    fn from(err: fast_sfdc_tooling::Error) -> Self {
        use fast_sfdc_tooling::ErrorKind as ToolingKind;

        let kind = match &err.kind {
            ToolingKind::Unreachable(_) => ErrorKind::Unreachable,
            ToolingKind::Unauthorized(msg) => ErrorKind::Unauthorized(msg.clone()),
            _ => ErrorKind::Tooling(err.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<fast_sfdc_metadata::Error> for Error {
    fn from(err: fast_sfdc_metadata::Error) -> Self {
        use fast_sfdc_metadata::ErrorKind as MetadataKind;

        let kind = match &err.kind {
            MetadataKind::Unreachable(_) => ErrorKind::Unreachable,
            MetadataKind::Unauthorized(msg) => ErrorKind::Unauthorized(msg.clone()),
            MetadataKind::Manifest(msg) => ErrorKind::Manifest(msg.clone()),
            _ => ErrorKind::Metadata(err.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<fast_sfdc_client::Error> for Error {
    fn from(err: fast_sfdc_client::Error) -> Self {
        use fast_sfdc_client::{ErrorKind as ClientKind, FailureClass};

        let kind = match (err.class(), &err.kind) {
            (FailureClass::Unreachable, _) => ErrorKind::Unreachable,
            (FailureClass::Unauthorized, _) => ErrorKind::Unauthorized(err.to_string()),
            (_, ClientKind::Config(msg) | ClientKind::InvalidUrl(msg)) => ErrorKind::Config(msg.clone()),
            _ => ErrorKind::Transport(err.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}
