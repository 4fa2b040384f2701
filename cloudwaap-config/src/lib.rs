//! Configuration loading for the Cloud WAAP log normalizer
//!
//! A [`ConfigManager`] layers configuration documents: values from a JSON,
//! TOML or `.env` file first, then overrides from prefixed environment
//! variables. The merged document deserializes into any `DeserializeOwned`
//! type and can be checked with [`Validate`].
//!
//! ```rust,no_run
//! use cloudwaap_config::ConfigManager;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Settings {
//!     output_format: String,
//! }
//!
//! let mut manager = ConfigManager::with_prefix("CLOUDWAAP");
//! manager.load_file("pipeline.toml")?;
//! manager.load_env()?;
//! let settings: Settings = manager.deserialize()?;
//! # Ok::<(), cloudwaap_config::ConfigError>(())
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Layered configuration document
#[derive(Debug, Clone)]
pub struct ConfigManager {
    values: Value,
    env_prefix: Option<String>,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self {
            values: Value::Object(Map::new()),
            env_prefix: None,
        }
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            values: Value::Object(Map::new()),
            env_prefix: Some(prefix.into()),
        }
    }

    fn env_loader(&self) -> EnvLoader {
        EnvLoader::new(self.env_prefix.clone())
    }

    /// Load configuration from a file, picking the format by extension
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let loader = ConfigLoader::auto(path.as_ref())?;
        let data = loader.load_file(path)?;
        self.merge(data)
    }

    /// Overlay prefixed environment variables
    pub fn load_env(&mut self) -> Result<()> {
        self.load_env_from(std::env::vars())
    }

    /// Overlay an explicit set of variables, filtered by the prefix
    pub fn load_env_from<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let applied = self.env_loader().apply(&mut self.values, vars);
        debug!(prefix = ?self.env_prefix, keys = applied, "Applied environment overrides");
        Ok(())
    }

    /// Load a `.env` file into the process environment, then overlay it
    pub fn load_dotenv(&mut self, path: Option<&Path>) -> Result<()> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok(); // Ignore if .env doesn't exist
        }
        self.load_env()
    }

    /// Deep-merge a document over the current values
    pub fn merge(&mut self, data: Value) -> Result<()> {
        if !data.is_object() {
            return Err(ConfigError::ParseError(
                "configuration root must be a table/object".to_string(),
            ));
        }
        merge_values(&mut self.values, data);
        Ok(())
    }

    /// Deserialize the merged document
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.values.clone())
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Deserialize and validate the merged document
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let validated: T = self.deserialize()?;
        validated.validate()?;
        Ok(validated)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge `patch` into `base`: objects merge key by key, anything else
/// replaces the existing value.
pub fn merge_values(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
