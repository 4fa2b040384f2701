//! Configuration for the payload codec

/// Default upper bound for a decoded log object (256 MiB).
pub const DEFAULT_MAX_DECODED_SIZE: usize = 256 * 1024 * 1024;

/// Configuration for decoding log payloads
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    /// Maximum size of a decoded payload in bytes
    pub max_decoded_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_decoded_size: DEFAULT_MAX_DECODED_SIZE,
        }
    }
}

impl CompressionConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuration
    pub fn builder() -> CompressionConfigBuilder {
        CompressionConfigBuilder::new()
    }
}

/// Builder for CompressionConfig
#[derive(Debug, Clone, Default)]
pub struct CompressionConfigBuilder {
    config: CompressionConfig,
}

impl CompressionConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: CompressionConfig::default(),
        }
    }

    /// Set the maximum decoded payload size
    pub fn max_decoded_size(mut self, size: usize) -> Self {
        self.config.max_decoded_size = size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CompressionConfig {
        self.config
    }
}
