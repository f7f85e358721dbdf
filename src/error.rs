//! Error types for cumulus.

use thiserror::Error;

/// Common error type for cumulus.
#[derive(Error, Debug)]
pub enum CumulusError {
    /// Database error.
    ///
    /// Wraps errors from the persistence backend. sqlx errors are
    /// converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Downstream transport error (object store, Telegram API).
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for CumulusError {
    fn from(e: sqlx::Error) -> Self {
        CumulusError::Database(e.to_string())
    }
}

/// Result type alias for cumulus operations.
pub type Result<T> = std::result::Result<T, CumulusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = CumulusError::Validation("file too large".to_string());
        assert_eq!(err.to_string(), "validation error: file too large");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = CumulusError::NotFound("file".to_string());
        assert_eq!(err.to_string(), "file not found");
    }

    #[test]
    fn test_transport_error_display() {
        let err = CumulusError::Transport("download failed".to_string());
        assert_eq!(err.to_string(), "transport error: download failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CumulusError = io_err.into();
        assert!(matches!(err, CumulusError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(CumulusError::Validation("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
