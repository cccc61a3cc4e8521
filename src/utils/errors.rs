// src/utils/errors.rs
//! Crate-level error types
//!
//! Errors that can abort setup work (loading configuration, opening an audit
//! file). Errors produced while intercepting a request live next to the
//! interceptor in [`crate::interception::errors`].

use thiserror::Error;

/// Result alias for setup operations
pub type Result<T> = std::result::Result<T, TapError>;

/// Setup errors
#[derive(Error, Debug)]
pub enum TapError {
    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audit sink could not be opened
    #[error("Sink error: {0}")]
    Sink(#[from] std::io::Error),

    /// Tracing subscriber could not be installed
    #[error("Observability error: {0}")]
    Observability(String),
}

impl From<::config::ConfigError> for TapError {
    fn from(err: ::config::ConfigError) -> Self {
        TapError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = TapError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TapError = io.into();
        assert!(matches!(err, TapError::Sink(_)));
    }
}
