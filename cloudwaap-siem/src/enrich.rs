//! Metadata stamping

use crate::log_type::LogType;
use crate::record::LogRecord;
use serde_json::Value;

/// Stamps `logType`, `applicationName` and `tenantName` onto records
#[derive(Debug, Clone, Copy, Default)]
pub struct Enricher;

impl Enricher {
    /// Enrich one record in place.
    ///
    /// `logType` is always overwritten. `applicationName` is added only to
    /// WebDDoS records that lack it (`null` when the key named no
    /// application). `tenantName` is added to every non-Access record that
    /// lacks it.
    pub fn enrich(
        record: &mut LogRecord,
        log_type: LogType,
        application_name: Option<&str>,
        tenant_name: &str,
    ) {
        record.insert(
            "logType".to_string(),
            Value::String(log_type.as_str().to_string()),
        );

        if log_type == LogType::WebDdos && !record.contains_key("applicationName") {
            let value = application_name
                .map(|app| Value::String(app.to_string()))
                .unwrap_or(Value::Null);
            record.insert("applicationName".to_string(), value);
        }

        if log_type != LogType::Access && !record.contains_key("tenantName") {
            record.insert(
                "tenantName".to_string(),
                Value::String(tenant_name.to_string()),
            );
        }
    }
}
