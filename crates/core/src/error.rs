use insights_api::{ApiError, ArchiveError, TlsError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Not associated with a server")]
    NotAServer,
    #[error("Invalid lifecycle transition: {0}")]
    InvalidTransition(String),
    #[error("Insights init failure")]
    Init(#[source] Box<InsightsError>),
    #[error("Error setting TLS")]
    Tls(#[from] TlsError),
    #[error("Opted out of insights reporting")]
    OptedOut,
    #[error("Delivery error: {0}")]
    Delivery(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InsightsError {
    /// Wraps a startup failure, leaving already-wrapped errors alone.
    pub fn init(err: InsightsError) -> Self {
        match err {
            wrapped @ InsightsError::Init(_) => wrapped,
            other => InsightsError::Init(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_init_message_is_bare_and_chains_cause() {
        let err = InsightsError::init(InsightsError::Delivery(
            "upload endpoint unreachable".to_string(),
        ));

        assert_eq!(err.to_string(), "Insights init failure");
        let cause = err.source().map(|e| e.to_string());
        assert_eq!(
            cause.as_deref(),
            Some("Delivery error: upload endpoint unreachable")
        );
    }

    #[test]
    fn test_init_does_not_double_wrap() {
        let err = InsightsError::init(InsightsError::init(InsightsError::NotAServer));
        match err {
            InsightsError::Init(inner) => assert!(matches!(*inner, InsightsError::NotAServer)),
            other => panic!("expected init failure, got {other:?}"),
        }
    }

    #[test]
    fn test_tls_message_is_bare() {
        let err = InsightsError::from(TlsError::MissingMaterial("/etc/cert.pem".to_string()));
        assert_eq!(err.to_string(), "Error setting TLS");
        assert!(err.source().is_some());
    }
}
