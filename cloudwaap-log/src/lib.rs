//! Cloud WAAP Logging Setup
//!
//! Installs the global `tracing` subscriber for the normalizer, driven by
//! environment variables so the same build behaves well on a developer
//! terminal and inside a function runtime that ships stderr to a log store.
//!
//! # Usage
//!
//! ```rust,no_run
//! cloudwaap_log::init();
//!
//! tracing::info!(key = "tenant/x/WAF/rdwr_event_x_app_20240101H000000.json.gz", "Processing");
//! ```
//!
//! # Environment Variables
//!
//! - `CLOUDWAAP_DEBUG=1` - Shorthand for the `debug` level
//! - `CLOUDWAAP_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `CLOUDWAAP_LOG_FORMAT=json|pretty|compact` - Set output format
//! - `CLOUDWAAP_LOG_ANSI=1|0` - Enable/disable colors for text formats
//! - `RUST_LOG` - Full `EnvFilter` directive, wins over the level above

use once_cell::sync::OnceCell;
use std::env;
use tracing_subscriber::util::TryInitError;

// ============================================================================
// Log Levels
// ============================================================================

/// Log level for the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level (least verbose)
    Error = 4,
    /// Off (no logging)
    Off = 5,
}

impl Level {
    /// Get level from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Get the `EnvFilter` directive for this level.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_directive().to_uppercase())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable format
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl Format {
    /// Get format from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether text formats use ANSI colors
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: Format::Json,
            ansi: false, // JSON output doesn't use colors
        }
    }
}

impl LogConfig {
    /// Create config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| {
            lookup(key).map(|v| {
                let v = v.trim().to_lowercase();
                v == "1" || v == "true"
            })
        };

        let debug = flag("CLOUDWAAP_DEBUG").unwrap_or(false);

        let level = lookup("CLOUDWAAP_LOG_LEVEL")
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = lookup("CLOUDWAAP_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        let ansi = flag("CLOUDWAAP_LOG_ANSI").unwrap_or(false);

        Self {
            level,
            format,
            ansi,
        }
    }

    /// Set the log level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }
}

// ============================================================================
// Public API
// ============================================================================

static INITIALIZED: OnceCell<LogConfig> = OnceCell::new();

/// Initialize logging from the environment, ignoring a subscriber that is
/// already installed.
pub fn init() {
    let _ = try_init_with(LogConfig::from_env());
}

/// Initialize logging from the environment.
pub fn try_init() -> Result<(), TryInitError> {
    try_init_with(LogConfig::from_env())
}

/// Initialize logging with an explicit configuration.
///
/// Only the first successful call installs a subscriber; later calls are
/// no-ops and keep the original configuration.
pub fn try_init_with(config: LogConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        #[cfg(feature = "json")]
        Format::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .try_init()?,
        #[cfg(not(feature = "json"))]
        Format::Json => registry
            .with(fmt::layer().compact().with_ansi(false))
            .try_init()?,
        Format::Pretty => registry
            .with(fmt::layer().pretty().with_ansi(config.ansi))
            .try_init()?,
        Format::Compact => registry
            .with(fmt::layer().compact().with_ansi(config.ansi))
            .try_init()?,
    }

    let _ = INITIALIZED.set(config);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
