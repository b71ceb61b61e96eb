//! Error types for autobot.

use thiserror::Error;

/// Result type alias using autobot's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for autobot operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Empty or malformed keyword, query, or parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Persistence call made without a resolved user
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// External store, metrics source, or Google API failed
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sealing or opening a stored secret failed
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure came from a collaborator outside the process
    /// (the relational store or an HTTP service).
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::UpstreamUnavailable(_) | Error::Database(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::UpstreamUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_argument() {
        let err = Error::InvalidArgument("keyword must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: keyword must not be empty"
        );
    }

    #[test]
    fn test_error_display_not_authenticated() {
        let err = Error::NotAuthenticated("no current user".to_string());
        assert_eq!(err.to_string(), "Not authenticated: no current user");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("recommended keyword 42".to_string());
        assert_eq!(err.to_string(), "Not found: recommended keyword 42");
    }

    #[test]
    fn test_error_display_upstream() {
        let err = Error::UpstreamUnavailable("token endpoint returned 503".to_string());
        assert_eq!(
            err.to_string(),
            "Upstream unavailable: token endpoint returned 503"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing google_client_id".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: missing google_client_id"
        );
    }

    #[test]
    fn test_is_upstream() {
        assert!(Error::UpstreamUnavailable("x".into()).is_upstream());
        assert!(Error::Database(sqlx::Error::RowNotFound).is_upstream());
        assert!(!Error::NotFound("x".into()).is_upstream());
        assert!(!Error::InvalidArgument("x".into()).is_upstream());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
