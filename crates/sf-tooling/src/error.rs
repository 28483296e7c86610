//! Error types for fast-sfdc-tooling.

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
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The instance could not be reached.
    #[error("Unreachable host: {0}")]
    Unreachable(String),

    /// The session was rejected (HTTP 401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An sObject name or record id failed validation before sending.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Salesforce error: {error_code} - {message}")]
    Salesforce { error_code: String, message: String },
}

impl From<fast_sfdc_client::Error> for Error {
    fn from(err: fast_sfdc_client::Error) -> Self {
        use fast_sfdc_client::{ErrorKind as ClientKind, FailureClass};

        let kind = match (err.class(), &err.kind) {
            (FailureClass::Unreachable, _) => ErrorKind::Unreachable(err.to_string()),
            (FailureClass::Unauthorized, _) => ErrorKind::Unauthorized(err.to_string()),
            (
                FailureClass::Other,
                ClientKind::SalesforceApi {
                    error_code,
                    message,
                    ..
                },
            ) => ErrorKind::Salesforce {
                error_code: error_code.clone(),
                message: message.clone(),
            },
            (FailureClass::Other, _) => ErrorKind::Client(err.to_string()),
        };
        Error {
            kind,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fast_sfdc_client::ErrorKind as ClientKind;

    #[test]
    fn test_client_error_classification_is_preserved() {
        let err: Error = fast_sfdc_client::Error::new(ClientKind::Connection("refused".into())).into();
        assert!(matches!(err.kind, ErrorKind::Unreachable(_)));

        let err: Error =
            fast_sfdc_client::Error::new(ClientKind::Authentication("INVALID_SESSION_ID".into())).into();
        assert!(matches!(err.kind, ErrorKind::Unauthorized(_)));

        let err: Error = fast_sfdc_client::Error::new(ClientKind::SalesforceApi {
            error_code: "MALFORMED_QUERY".into(),
            message: "unexpected token".into(),
            fields: vec![],
        })
        .into();
        match err.kind {
            ErrorKind::Salesforce { error_code, .. } => assert_eq!(error_code, "MALFORMED_QUERY"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
