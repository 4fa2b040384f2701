// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration after it has been loaded
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a storage key prefix stays inside its root
    pub fn is_relative_key(value: &str, field: &str) -> Result<()> {
        if value.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(ConfigError::ValidationError(format!(
                "{} must not contain '..' segments",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a key segment contains no separator
    pub fn is_segment(value: &str, field: &str) -> Result<()> {
        if value.contains('/') {
            return Err(ConfigError::ValidationError(format!(
                "{} must not contain '/'",
                field
            )));
        }
        Ok(())
    }
}
