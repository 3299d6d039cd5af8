use std::path::Path;
use thiserror::Error;

/// Result type alias for TLD dataset operations
pub type Result<T> = std::result::Result<T, TldError>;

/// Errors that can occur while reading sources, building, or persisting the dataset
#[derive(Error, Debug)]
pub enum TldError {
    /// File system access failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that was being read or written
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(String),

    /// A source file was readable but did not have the expected shape
    #[error("malformed source {source_name}: {message}")]
    MalformedSource {
        /// Which source was being read
        source_name: String,
        /// What was wrong with it
        message: String,
    },

    /// Invalid IP address format
    #[error("invalid IP address: {0}")]
    InvalidIp(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with an unexpected status
    #[error("unexpected HTTP status {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl TldError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Build a [`TldError::MalformedSource`]
    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSource {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error is worth retrying (transport failures and 5xx)
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status >= 500 && *status < 600,
            _ => false,
        }
    }

    /// Returns true if the error means the file simply does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
