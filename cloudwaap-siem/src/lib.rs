//! Cloud WAAP security log normalization for SIEM ingestion
//!
//! This crate turns exported Cloud WAAP log objects (Access, WAF, Bot, DDoS
//! and WebDDoS) into formats SIEM products ingest directly. Everything the
//! normalizer needs to know about an object comes from its storage key and
//! from a tenant/application scoped filter policy.
//!
//! # Features
//!
//! - **Key classification** - log type, tenant and application from the key path
//! - **Filtering** - per log type policies with per-application overrides
//! - **Enrichment** - stamp `logType`, `tenantName` and `applicationName`
//! - **Multiple Formats** - NDJSON, JSON, CEF, LEEF, or `json.gz` passthrough
//! - **Pluggable I/O** - [`Source`] and [`Sink`] traits with memory and
//!   directory stores
//!
//! # Quick Start
//!
//! ```
//! use cloudwaap_siem::*;
//!
//! # async fn example() -> SiemResult<()> {
//! let store = MemoryStore::new();
//! store
//!     .insert(
//!         "tenantA/logs/Bot/rdwr_event_tenantA_app1_20240101H000000.json.gz",
//!         br#"[{"action":"Block","time":"1700000000"}]"#.to_vec(),
//!     )
//!     .await;
//!
//! let config = PipelineConfig::builder()
//!     .enable_filtering(false)
//!     .output_format(OutputFormat::Cef)
//!     .build()?;
//!
//! let pipeline = Pipeline::new(config, store.clone(), store.clone());
//! let report = pipeline
//!     .process("tenantA/logs/Bot/rdwr_event_tenantA_app1_20240101H000000.json.gz")
//!     .await?;
//!
//! assert_eq!(report.outcome, ProcessOutcome::Written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Encoding a single record
//!
//! ```
//! use cloudwaap_siem::*;
//! use serde_json::json;
//!
//! let meta = KeyPathClassifier::classify_or_unknown(
//!     "tenantA/logs/WAF/rdwr_event_tenantA_app1_20240101H000000.json.gz",
//! );
//! let record = json!({ "action": "Blocked", "severity": "High" });
//!
//! let line = encode_cef(record.as_object().unwrap(), &meta);
//! assert!(line.starts_with("CEF:0|Radware|CloudWAF|1.0|2|WAFLog|8|"));
//! ```

pub mod classify;
pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod format;
pub mod log_type;
pub mod output_key;
pub mod pipeline;
pub mod record;
pub mod severity;
pub mod store;

pub use classify::{KeyMetadata, KeyPathClassifier};
pub use config::*;
pub use enrich::Enricher;
pub use error::*;
pub use filter::FilterEngine;
pub use flatten::LogFlattener;
pub use format::{
    CefFormatter, EventFormatter, JsonFormatter, LeefFormatter, NdjsonFormatter, encode_cef,
    encode_leef, get_formatter, to_json, to_ndjson,
};
pub use log_type::LogType;
pub use output_key::OutputKeyBuilder;
pub use pipeline::*;
pub use record::{LogRecord, RecordExt};
pub use severity::SeverityMapper;
pub use store::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reexports_compose() {
        let key = "tenantA/logs/DDoS/rdwr_event_tenantA_app1_20240101H000000.json.gz";
        let meta = KeyPathClassifier::classify(key).unwrap();
        assert_eq!(meta.log_type, LogType::Ddos);

        let mut record = json!({ "action": "Drop" }).as_object().cloned().unwrap();
        Enricher::enrich(
            &mut record,
            meta.log_type,
            meta.application_name.as_deref(),
            &meta.tenant_name,
        );

        let ndjson = to_ndjson(std::slice::from_ref(&record)).unwrap();
        assert_eq!(
            ndjson,
            "{\"action\": \"Drop\", \"logType\": \"DDoS\", \"tenantName\": \"tenantA\"}"
        );

        let line = encode_leef(&record, &meta);
        assert!(line.starts_with("LEEF:2.0|Radware|CloudWAF|1.0|DDoSLog|"));
        assert!(line.contains("\\tact=Drop"));
    }

    #[test]
    fn test_error_display() {
        let err = SiemError::MalformedPayload {
            key: "k".to_string(),
            reason: "empty payload".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed payload in k: empty payload");
    }
}
