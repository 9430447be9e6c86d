//! Error types for homestage.

use thiserror::Error;

/// Result type alias using homestage's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for homestage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Property not found
    #[error("Property not found: {0}")]
    PropertyNotFound(i64),

    /// Ingestion failed
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Search operation failed
    #[error("Search error: {0}")]
    Search(String),

    /// Image decode/encode/composite failed
    #[error("Image error: {0}")]
    Image(String),

    /// Object storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_property_not_found() {
        let err = Error::PropertyNotFound(42);
        assert_eq!(err.to_string(), "Property not found: 42");
    }

    #[test]
    fn test_error_display_ingest() {
        let err = Error::Ingest("missing searchResults".to_string());
        assert_eq!(err.to_string(), "Ingest error: missing searchResults");
    }

    #[test]
    fn test_error_display_search() {
        let err = Error::Search("query failed".to_string());
        assert_eq!(err.to_string(), "Search error: query failed");
    }

    #[test]
    fn test_error_display_image() {
        let err = Error::Image("not a decodable image".to_string());
        assert_eq!(err.to_string(), "Image error: not a decodable image");
    }

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("put rejected".to_string());
        assert_eq!(err.to_string(), "Storage error: put rejected");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing bucket".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing bucket");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("negative id".to_string());
        assert_eq!(err.to_string(), "Invalid input: negative id");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
