//! One-object normalization pipeline
//!
//! `fetch -> decode -> parse -> classify -> skip? -> filter/enrich -> format -> put`
//!
//! Everything between fetch and put is synchronous and owned by a single
//! invocation; see [`Pipeline::convert`].

use crate::classify::{KeyMetadata, KeyPathClassifier};
use crate::config::{OutputFormat, PipelineConfig};
use crate::enrich::Enricher;
use crate::error::{SiemError, SiemResult};
use crate::filter::FilterEngine;
use crate::format::get_formatter;
use crate::log_type::LogType;
use crate::output_key::OutputKeyBuilder;
use crate::record::LogRecord;
use async_trait::async_trait;
use bytes::Bytes;
use cloudwaap_compression::{CompressionAlgorithm, CompressionConfig};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Supplies raw object bytes by key
#[async_trait]
pub trait Source: Send + Sync {
    async fn fetch(&self, key: &str) -> SiemResult<Bytes>;
}

/// Accepts produced objects
#[async_trait]
pub trait Sink: Send + Sync {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> SiemResult<()>;
}

/// What happened to an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessOutcome {
    /// Converted and written
    Written,
    /// Dropped as a whole by a disabled policy
    Skipped,
    /// Forwarded unchanged
    PassedThrough,
}

/// Summary of one processed object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub key: String,
    pub outcome: ProcessOutcome,
    pub log_type: LogType,
    pub tenant_name: String,
    pub application_name: Option<String>,
    pub received: usize,
    pub kept: usize,
    pub dropped: usize,
    pub output_key: Option<String>,
    pub content_type: Option<&'static str>,
}

impl ProcessReport {
    fn new(key: &str, outcome: ProcessOutcome, meta: KeyMetadata) -> Self {
        Self {
            key: key.to_string(),
            outcome,
            log_type: meta.log_type,
            tenant_name: meta.tenant_name,
            application_name: meta.application_name,
            received: 0,
            kept: 0,
            dropped: 0,
            output_key: None,
            content_type: None,
        }
    }
}

/// Decoded payload as a record batch.
///
/// Accepts a JSON array of objects, a single object, or JSON Lines whose
/// lines are objects or arrays of objects.
pub fn parse_records(key: &str, payload: &[u8]) -> SiemResult<Vec<LogRecord>> {
    let malformed = |reason: String| SiemError::MalformedPayload {
        key: key.to_string(),
        reason,
    };

    let text = std::str::from_utf8(payload).map_err(|e| malformed(e.to_string()))?;
    if text.trim().is_empty() {
        return Err(malformed("empty payload".to_string()));
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => collect_objects(value).map_err(malformed),
        Err(whole) => {
            let mut records = Vec::new();
            for (idx, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let value: Value = serde_json::from_str(line).map_err(|e| {
                    malformed(format!("not JSON ({whole}); line {}: {e}", idx + 1))
                })?;
                records.extend(collect_objects(value).map_err(malformed)?);
            }
            Ok(records)
        }
    }
}

fn collect_objects(value: Value) -> Result<Vec<LogRecord>, String> {
    match value {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(map) => Ok(map),
                _ => Err(format!("element {idx} is not an object")),
            })
            .collect(),
        _ => Err("expected a JSON object or array of objects".to_string()),
    }
}

/// Filter and enrich records of one object, preserving order.
pub fn filter_and_enrich(
    config: &PipelineConfig,
    meta: &KeyMetadata,
    records: Vec<LogRecord>,
) -> Vec<LogRecord> {
    let engine = FilterEngine::new(config);
    let app = meta.application_name.as_deref();

    records
        .into_iter()
        .filter(|record| {
            !config.enable_filtering || engine.should_keep(record, app, meta.log_type)
        })
        .map(|mut record| {
            if config.enrich_logs {
                Enricher::enrich(&mut record, meta.log_type, app, &meta.tenant_name);
            }
            record
        })
        .collect()
}

fn is_text_key(key: &str) -> bool {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    file_name.to_ascii_lowercase().ends_with(".txt")
}

/// Normalizes objects from a source into a sink
///
/// # Examples
///
/// ```
/// use cloudwaap_siem::*;
///
/// # async fn example() -> SiemResult<()> {
/// let store = MemoryStore::new();
/// let config = PipelineConfig::builder()
///     .output_format(OutputFormat::Cef)
///     .build()?;
///
/// let pipeline = Pipeline::new(config, store.clone(), store.clone());
/// let report = pipeline
///     .process("tenantA/logs/Bot/rdwr_event_tenantA_app1_20240101H000000.json.gz")
///     .await?;
/// println!("{:?}", report.outcome);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    compression: CompressionConfig,
    source: Arc<dyn Source>,
    sink: Arc<dyn Sink>,
}

impl Pipeline {
    /// Create a pipeline over a source and a sink
    pub fn new(
        config: PipelineConfig,
        source: impl Source + 'static,
        sink: impl Sink + 'static,
    ) -> Self {
        Self {
            config,
            compression: CompressionConfig::default(),
            source: Arc::new(source),
            sink: Arc::new(sink),
        }
    }

    /// Override payload decoding limits
    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one object end to end.
    pub async fn process(&self, key: &str) -> SiemResult<ProcessReport> {
        let data = self.source.fetch(key).await?;
        let keys = OutputKeyBuilder::from_config(&self.config);

        // Everything but NDJSON is labelled as JSON, forwarded objects included
        if is_text_key(key) {
            let content_type = OutputFormat::Json.content_type();
            return self
                .pass_through(key, keys.passthrough(key), data, content_type)
                .await;
        }

        if self.config.output_format == OutputFormat::JsonGz {
            let data = match CompressionAlgorithm::detect(&data) {
                CompressionAlgorithm::Gzip => data,
                CompressionAlgorithm::None => {
                    debug!(key = %key, "Gzipping plain payload for json.gz output");
                    Bytes::from(cloudwaap_compression::gzip(&data)?)
                }
            };
            let content_type = OutputFormat::JsonGz.content_type();
            return self
                .pass_through(key, keys.build(key), data, content_type)
                .await;
        }

        let (mut report, body) = self.convert(key, &data)?;

        if let Some(body) = body {
            let output_key = keys.build(key);
            let content_type = self.config.output_format.content_type();
            self.sink
                .put(&output_key, Bytes::from(body), content_type)
                .await?;
            report.output_key = Some(output_key);
            report.content_type = Some(content_type);
        }

        info!(
            key = %key,
            outcome = ?report.outcome,
            log_type = %report.log_type,
            kept = report.kept,
            dropped = report.dropped,
            "Processed object"
        );

        Ok(report)
    }

    /// Convert a fetched payload without touching the sink.
    ///
    /// Returns the report and the rendered body, or no body when the whole
    /// object is skipped.
    pub fn convert(&self, key: &str, data: &[u8]) -> SiemResult<(ProcessReport, Option<String>)> {
        let decoded = cloudwaap_compression::decode(data, &self.compression)?;
        let records = parse_records(key, &decoded)?;
        let meta = KeyPathClassifier::classify_with_records(key, &records);
        let app = meta.application_name.as_deref();

        debug!(
            key = %key,
            log_type = %meta.log_type,
            tenant = %meta.tenant_name,
            application = ?app,
            records = records.len(),
            "Classified object"
        );

        let engine = FilterEngine::new(&self.config);
        if self.config.enable_filtering
            && !engine.allows_file(app, meta.log_type)
            && !self.config.is_skip_exempt(app)
        {
            info!(
                key = %key,
                log_type = %meta.log_type,
                application = ?app,
                "Skipping object disabled by filter policy"
            );
            let mut report = ProcessReport::new(key, ProcessOutcome::Skipped, meta);
            report.received = records.len();
            report.dropped = records.len();
            return Ok((report, None));
        }

        let received = records.len();
        let records = filter_and_enrich(&self.config, &meta, records);
        let body = get_formatter(self.config.output_format).format_batch(&records, &meta)?;

        let kept = records.len();
        let mut report = ProcessReport::new(key, ProcessOutcome::Written, meta);
        report.received = received;
        report.kept = kept;
        report.dropped = received - kept;

        Ok((report, Some(body)))
    }

    async fn pass_through(
        &self,
        key: &str,
        output_key: String,
        data: Bytes,
        content_type: &'static str,
    ) -> SiemResult<ProcessReport> {
        self.sink.put(&output_key, data, content_type).await?;

        info!(key = %key, output_key = %output_key, "Passed object through");

        let meta = KeyPathClassifier::classify_or_unknown(key);
        let mut report = ProcessReport::new(key, ProcessOutcome::PassedThrough, meta);
        report.output_key = Some(output_key);
        report.content_type = Some(content_type);
        Ok(report)
    }
}
