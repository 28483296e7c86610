//! Error types for the transport layer.
//!
//! Every failure the transport can produce maps onto a closed [`ErrorKind`].
//! Callers that need to decide between "give up", "log in again" and
//! "propagate" match on [`FailureClass`] instead of inspecting messages.

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for transport operations.
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

    /// How the session layer should react to this error.
    pub fn class(&self) -> FailureClass {
        self.kind.class()
    }

    /// Returns true if the host could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        self.class() == FailureClass::Unreachable
    }

    /// Returns true if the server rejected the session (HTTP 401 or 403).
    pub fn is_unauthorized(&self) -> bool {
        self.class() == FailureClass::Unauthorized
    }
}

/// Coarse classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// DNS resolution or TCP connect failed. Never retried.
    Unreachable,
    /// The server answered 401/403. A fresh session may succeed.
    Unauthorized,
    /// Anything else. Propagated unchanged.
    Other,
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// HTTP request failed.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limited")]
    RateLimited,

    /// Authentication error (HTTP 401).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authorization error (HTTP 403).
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// The host could not be reached (DNS or connect failure).
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Salesforce API error response.
    #[error("Salesforce API error: {error_code} - {message}")]
    SalesforceApi {
        error_code: String,
        message: String,
        fields: Vec<String>,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// Classify this error kind.
    pub fn class(&self) -> FailureClass {
        match self {
            ErrorKind::Connection(_) => FailureClass::Unreachable,
            ErrorKind::Authentication(_) | ErrorKind::Authorization(_) => {
                FailureClass::Unauthorized
            }
            _ => FailureClass::Other,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_unreachable() {
        let err = Error::new(ErrorKind::Connection("dns error".into()));
        assert_eq!(err.class(), FailureClass::Unreachable);
        assert!(err.is_unreachable());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_401_and_403_are_unauthorized() {
        let err = Error::new(ErrorKind::Authentication("Session expired".into()));
        assert!(err.is_unauthorized());

        let err = Error::new(ErrorKind::Authorization("forbidden".into()));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_everything_else_is_other() {
        let others = [
            ErrorKind::Timeout,
            ErrorKind::RateLimited,
            ErrorKind::NotFound("ApexClass/01p".into()),
            ErrorKind::Http {
                status: 500,
                message: "boom".into(),
            },
            ErrorKind::SalesforceApi {
                error_code: "MALFORMED_QUERY".into(),
                message: "unexpected token".into(),
                fields: vec![],
            },
        ];
        for kind in others {
            assert_eq!(kind.class(), FailureClass::Other, "{kind}");
        }
    }

    #[test]
    fn test_error_kind_display_messages() {
        let cases: Vec<(ErrorKind, &str)> = vec![
            (
                ErrorKind::Http {
                    status: 500,
                    message: "Internal Server Error".into(),
                },
                "HTTP error: 500 Internal Server Error",
            ),
            (ErrorKind::RateLimited, "Rate limited"),
            (
                ErrorKind::Authentication("expired token".into()),
                "Authentication error: expired token",
            ),
            (ErrorKind::Timeout, "Request timeout"),
            (
                ErrorKind::Connection("refused".into()),
                "Connection error: refused",
            ),
            (
                ErrorKind::InvalidUrl("no scheme".into()),
                "Invalid URL: no scheme",
            ),
            (ErrorKind::Other("something else".into()), "something else"),
        ];

        for (kind, expected) in cases {
            let display = kind.to_string();
            assert!(
                display.contains(expected),
                "Expected '{display}' to contain '{expected}'"
            );
        }
    }

    #[test]
    fn test_from_url_parse_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
        assert!(err.source.is_some());
    }
}
