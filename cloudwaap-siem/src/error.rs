//! Normalizer error types

use cloudwaap_compression::CompressionError;
use cloudwaap_config::ConfigError;
use thiserror::Error;

/// Invocation-level errors
///
/// Anything that returns `SiemError` aborts processing of the whole object.
/// Per-record problems never surface here; they are logged and the record
/// degrades to empty fields instead.
#[derive(Error, Debug)]
pub enum SiemError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload could not be inflated, or gzipped for `json.gz` output
    #[error("Compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Payload is not a JSON record batch
    #[error("Malformed payload in {key}: {reason}")]
    MalformedPayload { key: String, reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Source failed to supply an object
    #[error("Source error for {key}: {reason}")]
    Source { key: String, reason: String },

    /// Sink rejected an object
    #[error("Sink error for {key}: {reason}")]
    Sink { key: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for SiemError {
    fn from(err: ConfigError) -> Self {
        SiemError::Config(err.to_string())
    }
}

/// Result type for normalizer operations
pub type SiemResult<T> = Result<T, SiemError>;

/// Why an object key could not be classified
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key is empty
    #[error("object key is empty")]
    Empty,

    /// The file name is neither `rdwr_log*` nor `rdwr_event*`
    #[error("unrecognized log file name: {0}")]
    UnrecognizedFileName(String),

    /// An event file name without a log-type directory in front of it
    #[error("event key has no log-type directory: {0}")]
    MissingTypeDirectory(String),
}
