//! Payload codec for Cloud WAAP log objects
//!
//! Cloud WAAP exports every log object as gzip-compressed UTF-8 JSON. This
//! crate detects and inflates those payloads before the normalizer parses
//! them, and gzips payloads that must leave as `json.gz`.
//!
//! # Features
//!
//! - `gzip` - Enable gzip support (enabled by default)
//! - `full` - Enable all supported algorithms
//!
//! # Example
//!
//! ```rust
//! use cloudwaap_compression::{decode, gzip, CompressionConfig};
//!
//! let config = CompressionConfig::default();
//! let packed = gzip(br#"[{"action":"Blocked"}]"#).unwrap();
//! let plain = decode(&packed, &config).unwrap();
//! assert_eq!(plain, br#"[{"action":"Blocked"}]"#.to_vec());
//! ```

mod algorithm;
mod config;
mod error;

pub use algorithm::{CompressionAlgorithm, GZIP_MAGIC};
pub use config::{CompressionConfig, CompressionConfigBuilder, DEFAULT_MAX_DECODED_SIZE};
pub use error::CompressionError;

use tracing::debug;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, CompressionError>;

/// Decode a payload, inflating it when it carries the gzip magic.
///
/// Data without the magic is returned as-is (bounded by
/// `max_decoded_size`); data with the magic that fails to inflate is an
/// error.
pub fn decode(data: &[u8], config: &CompressionConfig) -> Result<Vec<u8>> {
    let algorithm = CompressionAlgorithm::detect(data);
    let decoded = algorithm.decompress(data, config.max_decoded_size)?;

    debug!(
        algorithm = %algorithm,
        encoded_bytes = data.len(),
        decoded_bytes = decoded.len(),
        "Decoded payload"
    );

    Ok(decoded)
}

/// Shorthand for gzip-encoding with the default level.
#[cfg(feature = "gzip")]
pub fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let algorithm = CompressionAlgorithm::Gzip;
    algorithm.compress(data, algorithm.default_level())
}
