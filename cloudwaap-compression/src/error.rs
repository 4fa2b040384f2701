//! Error types for payload compression

use thiserror::Error;

/// Errors that can occur while encoding or decoding a log payload
#[derive(Error, Debug)]
pub enum CompressionError {
    /// Compression operation failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Decompression operation failed (truncated or corrupt stream)
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Decoded payload exceeded the configured limit
    #[error("Decompressed payload exceeds limit of {0} bytes")]
    PayloadTooLarge(usize),

    /// Invalid compression level
    #[error("Invalid compression level: {0} (must be between {1} and {2})")]
    InvalidLevel(u32, u32, u32),
}
