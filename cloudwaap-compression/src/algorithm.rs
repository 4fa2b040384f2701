//! Compression algorithm implementations

use crate::{CompressionError, Result};
use std::io::Read;
#[cfg(feature = "gzip")]
use std::io::Write;

/// Magic bytes at the start of every gzip member (RFC 1952).
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Supported payload encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    /// Gzip, the encoding Cloud WAAP uses for exported log objects
    #[cfg(feature = "gzip")]
    Gzip,

    /// No compression (pass-through)
    None,
}

impl CompressionAlgorithm {
    /// Detect the encoding of a payload from its leading bytes.
    ///
    /// Anything that does not carry the gzip magic is treated as plain data.
    pub fn detect(data: &[u8]) -> Self {
        #[cfg(feature = "gzip")]
        if data.starts_with(&GZIP_MAGIC) {
            return Self::Gzip;
        }

        Self::None
    }

    /// Get the minimum compression level for this algorithm
    pub fn min_level(&self) -> u32 {
        match self {
            #[cfg(feature = "gzip")]
            Self::Gzip => 1,
            Self::None => 0,
        }
    }

    /// Get the maximum compression level for this algorithm
    pub fn max_level(&self) -> u32 {
        match self {
            #[cfg(feature = "gzip")]
            Self::Gzip => 9,
            Self::None => 0,
        }
    }

    /// Get the default compression level for this algorithm
    pub fn default_level(&self) -> u32 {
        match self {
            #[cfg(feature = "gzip")]
            Self::Gzip => 6,
            Self::None => 0,
        }
    }

    /// Compress data using this algorithm
    pub fn compress(&self, data: &[u8], level: u32) -> Result<Vec<u8>> {
        match self {
            #[cfg(feature = "gzip")]
            Self::Gzip => {
                if level < self.min_level() || level > self.max_level() {
                    return Err(CompressionError::InvalidLevel(
                        level,
                        self.min_level(),
                        self.max_level(),
                    ));
                }
                compress_gzip(data, level)
            }
            Self::None => Ok(data.to_vec()),
        }
    }

    /// Decompress data using this algorithm.
    ///
    /// `limit` caps the decoded size; exceeding it is an error rather than a
    /// silent truncation.
    pub fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>> {
        match self {
            #[cfg(feature = "gzip")]
            Self::Gzip => decompress_gzip(data, limit),
            Self::None => read_limited(data, limit),
        }
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "gzip")]
            Self::Gzip => write!(f, "gzip"),
            Self::None => write!(f, "none"),
        }
    }
}

fn read_limited<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    // One extra byte tells "exactly at the limit" apart from "over it".
    let read = reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut output)
        .map_err(|e| CompressionError::DecompressionFailed(e.to_string()))?;

    if read > limit {
        return Err(CompressionError::PayloadTooLarge(limit));
    }

    Ok(output)
}

// ========== Gzip Implementation ==========

#[cfg(feature = "gzip")]
fn compress_gzip(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))
}

#[cfg(feature = "gzip")]
fn decompress_gzip(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    use flate2::read::MultiGzDecoder;

    // Exports are sometimes concatenated gzip members.
    read_limited(MultiGzDecoder::new(data), limit)
}
