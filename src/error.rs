//! Error types for vision-chat

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// A local image could not be read
    #[error("Failed to read image file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// HTTP transport error (connection, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a new request failure from a status code and response body
    pub fn request_failed(status: u16, body: impl Into<String>) -> Self {
        Error::RequestFailed {
            status,
            body: body.into(),
        }
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// HTTP status of a failed request, if this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RequestFailed { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_file_read() {
        let err = Error::file_read(
            "/tmp/missing.png",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert!(matches!(err, Error::FileRead { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to read image file /tmp/missing.png: No such file or directory"
        );
    }

    #[test]
    fn test_error_file_read_keeps_source() {
        use std::error::Error as _;

        let err = Error::file_read(
            "a.png",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let source = err.source().expect("io error should be the source");
        assert_eq!(source.to_string(), "denied");
    }

    #[test]
    fn test_error_request_failed() {
        let err = Error::request_failed(401, "{\"error\":\"invalid api key\"}");
        assert!(matches!(err, Error::RequestFailed { status: 401, .. }));
        assert_eq!(
            err.to_string(),
            "Request failed with status 401: {\"error\":\"invalid api key\"}"
        );
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_error_config() {
        let err = Error::config("api key is required");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Invalid configuration: api key is required");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_error_invalid_input() {
        let err = Error::invalid_input("unknown detail level: ultra");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid input: unknown detail level: ultra");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_from_reqwest() {
        // Compile-time check of the conversion
        fn _test_conversion(e: reqwest::Error) -> Error {
            e.into()
        }
    }
}
