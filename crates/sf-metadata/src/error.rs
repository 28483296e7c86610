//! Error types for fast-sfdc-metadata.

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
        Self { kind, source: Some(Box::new(source)) }
    }

    /// The call should be retried with a fresh session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ErrorKind::Unauthorized(_))
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self.kind, ErrorKind::Unreachable(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Unreachable host: {0}")]
    Unreachable(String),

    /// HTTP 401/403, or a fault with code `INVALID_SESSION_ID`.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("SOAP fault: {code}: {message}")]
    SoapFault { code: String, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid package manifest: {0}")]
    Manifest(String),

    #[error("Client error: {0}")]
    Client(String),
}

impl From<fast_sfdc_client::Error> for Error {
    fn from(err: fast_sfdc_client::Error) -> Self {
        use fast_sfdc_client::FailureClass;

        let kind = match err.class() {
            FailureClass::Unreachable => ErrorKind::Unreachable(err.to_string()),
            FailureClass::Unauthorized => ErrorKind::Unauthorized(err.to_string()),
            FailureClass::Other => ErrorKind::Client(err.to_string()),
        };
        Error { kind, source: Some(Box::new(err)) }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error { kind: ErrorKind::Manifest(err.to_string()), source: Some(Box::new(err)) }
    }
}
