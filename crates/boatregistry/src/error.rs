//! Error types for boatregistry.
//!
//! This module defines all error types used throughout the boatregistry crate,
//! from configuration loading through the spreadsheet client to the cached
//! row source.

use std::sync::Arc;

use thiserror::Error;

/// The main error type for boatregistry operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Required configuration values are absent.
    #[error("missing required configuration: {}", .keys.join(", "))]
    ConfigMissing {
        /// Names of the missing keys, in the legacy environment variable form.
        keys: Vec<&'static str>,
    },

    // === Spreadsheet Errors ===
    /// HTTP transport to the spreadsheet provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The spreadsheet provider answered with a non-success status.
    #[error("spreadsheet API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Exchanging the service-account assertion for an access token failed.
    #[error("service account authentication failed: {message}")]
    Auth {
        /// Description of what went wrong.
        message: String,
    },

    /// Parsing the private key or signing the assertion failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] openssl::error::ErrorStack),

    /// The configured sheet does not exist in the document.
    #[error("sheet \"{name}\" not found (available: {})", .available.join(", "))]
    SheetNotFound {
        /// The sheet title that was requested.
        name: String,
        /// Titles of the sheets the document does have.
        available: Vec<String>,
    },

    // === Registry Errors ===
    /// Populating the row cache failed.
    ///
    /// The cause is shared between every caller that waited on the same
    /// population, so it is held behind an [`Arc`].
    #[error("failed to fetch boat rows: {0}")]
    Fetch(#[source] Arc<Error>),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for boatregistry operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new authentication error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new upstream API error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error comes from configuration and should not be retried.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } | Self::ConfigMissing { .. }
        )
    }

    /// Check if this error is a failed cache population.
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// The underlying cause of a failed fetch, if this is one.
    #[must_use]
    pub fn fetch_cause(&self) -> Option<&Error> {
        match self {
            Self::Fetch(cause) => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");

        let err = Error::api(403, "The caller does not have permission");
        assert_eq!(
            err.to_string(),
            "spreadsheet API returned 403: The caller does not have permission"
        );
    }

    #[test]
    fn test_config_missing_lists_every_key() {
        let err = Error::ConfigMissing {
            keys: vec!["GOOGLE_PRIVATE_KEY", "GOOGLE_SHEET_ID"],
        };
        assert_eq!(
            err.to_string(),
            "missing required configuration: GOOGLE_PRIVATE_KEY, GOOGLE_SHEET_ID"
        );
        assert!(err.is_config_error());
    }

    #[test]
    fn test_sheet_not_found_display() {
        let err = Error::SheetNotFound {
            name: "Boats".to_string(),
            available: vec!["Sheet1".to_string(), "Archive".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Boats\""));
        assert!(msg.contains("Sheet1, Archive"));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_fetch_error_keeps_cause() {
        let cause = Arc::new(Error::auth("invalid_grant"));
        let err = Error::Fetch(Arc::clone(&cause));

        assert!(err.is_fetch_error());
        assert!(err.to_string().contains("invalid_grant"));
        assert!(matches!(err.fetch_cause(), Some(Error::Auth { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_config_error() {
        assert!(Error::config_validation("bad").is_config_error());
        assert!(!Error::internal("bug").is_config_error());
        assert!(!Error::internal("bug").is_fetch_error());
        assert!(Error::internal("bug").fetch_cause().is_none());
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_openssl_error() {
        let result = openssl::pkey::PKey::private_key_from_pem(b"not a key");
        if let Err(stack) = result {
            let err: Error = stack.into();
            assert!(matches!(err, Error::Crypto(_)));
        }
    }

    #[test]
    fn test_auth_error_display() {
        let err = Error::auth("invalid_grant: account not found");
        assert!(err.to_string().contains("account not found"));
    }
}
