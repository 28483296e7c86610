//! Error types for fast-sfdc-auth.
//!
//! Error messages never carry passwords or session ids.

/// Result type alias for fast-sfdc-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for fast-sfdc-auth operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The login host could not be reached.
    #[error("Unreachable host: {0}")]
    Unreachable(String),

    /// The login endpoint answered with a SOAP fault.
    #[error("Login failed: {code} - {message}")]
    LoginRejected { code: String, message: String },

    /// Missing or invalid connection configuration. Raised before any
    /// network traffic.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The login response could not be understood.
    #[error("Invalid login response: {0}")]
    InvalidResponse(String),

    /// HTTP error during authentication.
    #[error("HTTP error: {0}")]
    Http(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(String),

    /// JSON error while reading configuration.
    #[error("JSON error: {0}")]
    Json(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<fast_sfdc_client::Error> for Error {
    fn from(err: fast_sfdc_client::Error) -> Self {
        let message = err.to_string();
        let sanitized = if message.contains("Bearer") || message.contains("sessionId") {
            "Client error (details redacted for security)".to_string()
        } else {
            message
        };
        let kind = if err.is_unreachable() {
            ErrorKind::Unreachable(sanitized)
        } else {
            ErrorKind::Http(sanitized)
        };
        Error::with_source(kind, err)
    }
}
