//! Object key grammar
//!
//! Cloud WAAP writes every export under a positional path:
//!
//! ```text
//! <...>/<tenant>/<...>/<LogType>/rdwr_event_<tenant>_<app>_<YYYYMMDD>H<HHMMSS>...
//! <...>/rdwr_log...                                                  (Access)
//! ```
//!
//! The tenant is the fourth segment from the end. Access keys carry neither
//! tenant nor application; those come from the first record instead.

use crate::error::KeyError;
use crate::log_type::LogType;
use crate::record::{LogRecord, RecordExt};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

const ACCESS_PREFIX: &str = "rdwr_log";
const EVENT_PREFIX: &str = "rdwr_event";

/// What a key says about the object it names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetadata {
    pub log_type: LogType,
    pub tenant_name: String,
    pub application_name: Option<String>,
}

impl KeyMetadata {
    /// Metadata for a key nothing could be derived from
    pub fn unknown() -> Self {
        Self {
            log_type: LogType::Unknown,
            tenant_name: String::new(),
            application_name: None,
        }
    }
}

/// Log type from the file name and its parent directory. Never fails.
pub fn identify_log_type(key: &str) -> LogType {
    let parts: Vec<&str> = key.split('/').collect();
    let file_name = parts.last().copied().unwrap_or_default();

    if file_name.starts_with(ACCESS_PREFIX) {
        LogType::Access
    } else if file_name.starts_with(EVENT_PREFIX) && parts.len() >= 2 {
        LogType::from_dir_name(parts[parts.len() - 2])
    } else {
        LogType::Unknown
    }
}

/// Fourth segment from the end, or empty when the key is too shallow.
pub fn parse_tenant_name(key: &str) -> String {
    let parts: Vec<&str> = key.split('/').collect();
    if parts.len() >= 4 {
        parts[parts.len() - 4].to_string()
    } else {
        debug!(key = %key, "Unable to extract tenant name from key");
        String::new()
    }
}

/// Application token of `rdwr_event_<tenant>_<app>_<stamp>`.
pub fn parse_application_name(key: &str) -> Option<String> {
    let tenant = parse_tenant_name(key);
    let pattern = format!(
        r"rdwr_event_{}_([^_]+)_(\d{{8}}H\d{{6}})",
        regex::escape(&tenant)
    );

    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!(key = %key, error = %e, "Application name pattern rejected");
            return None;
        }
    };

    match re.captures(key).and_then(|caps| caps.get(1)) {
        Some(app) => Some(app.as_str().to_string()),
        None => {
            debug!(key = %key, "No application name found in key");
            None
        }
    }
}

/// Classifies object keys into [`KeyMetadata`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPathClassifier;

impl KeyPathClassifier {
    /// Classify a key, reporting why it does not follow the grammar.
    pub fn classify(key: &str) -> Result<KeyMetadata, KeyError> {
        if key.is_empty() {
            return Err(KeyError::Empty);
        }

        let parts: Vec<&str> = key.split('/').collect();
        let file_name = parts.last().copied().unwrap_or_default();

        if file_name.starts_with(ACCESS_PREFIX) {
            // Names are filled from the records by the caller
            return Ok(KeyMetadata {
                log_type: LogType::Access,
                tenant_name: String::new(),
                application_name: None,
            });
        }

        if !file_name.starts_with(EVENT_PREFIX) {
            return Err(KeyError::UnrecognizedFileName(file_name.to_string()));
        }
        if parts.len() < 2 {
            return Err(KeyError::MissingTypeDirectory(key.to_string()));
        }

        Ok(KeyMetadata {
            log_type: identify_log_type(key),
            tenant_name: parse_tenant_name(key),
            application_name: parse_application_name(key),
        })
    }

    /// Classify a key, degrading to `Unknown` with empty names.
    pub fn classify_or_unknown(key: &str) -> KeyMetadata {
        Self::classify(key).unwrap_or_else(|e| {
            debug!(key = %key, reason = %e, "Key degraded to Unknown");
            KeyMetadata::unknown()
        })
    }

    /// Classify a key together with its decoded records.
    ///
    /// Access objects take `tenant_name` and `application_name` from the
    /// first record.
    pub fn classify_with_records(key: &str, records: &[LogRecord]) -> KeyMetadata {
        let mut meta = Self::classify_or_unknown(key);
        if meta.log_type == LogType::Access {
            let (tenant, app) = names_from_records(records);
            meta.tenant_name = tenant;
            meta.application_name = (!app.is_empty()).then_some(app);
        }
        meta
    }
}

/// `(tenant_name, application_name)` of the first record, empty when absent.
pub fn names_from_records(records: &[LogRecord]) -> (String, String) {
    records
        .first()
        .map(|first| {
            (
                first.text_or_empty("tenant_name"),
                first.text_or_empty("application_name"),
            )
        })
        .unwrap_or_default()
}
