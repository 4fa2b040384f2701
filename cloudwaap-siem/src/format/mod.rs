//! Output encoders
//!
//! - **NDJSON / JSON** - batch serialization of enriched records
//! - **CEF** - Common Event Format (ArcSight, Splunk, etc.)
//! - **LEEF** - Log Event Extended Format (IBM QRadar)
//!
//! CEF and LEEF render one line per record from fixed field tables; the
//! field names and their order are part of the wire contract.

mod batch;
mod cef;
mod leef;
mod request;
mod sanitize;
mod table;
mod time;

pub use batch::*;
pub use cef::{CefFormatter, cef_table, encode_cef};
pub use leef::{LEEF_DELIMITER, LeefFormatter, encode_leef, leef_table};
pub use request::{RequestLine, WafRequest};
pub use sanitize::{sanitize, sanitize_header};
pub use table::{Context, EncodeInput, FieldSource, FieldSpec, Header, RequestPart};
pub use time::{access_epoch_millis, ddos_epoch_seconds, device_time, truncated_epoch};

use crate::classify::KeyMetadata;
use crate::config::OutputFormat;
use crate::error::SiemResult;
use crate::record::LogRecord;

/// Trait for rendering enriched records
pub trait EventFormatter: Send + Sync {
    /// Format one record
    fn format(&self, record: &LogRecord, meta: &KeyMetadata) -> SiemResult<String>;

    /// Format all records of one object into a single payload
    fn format_batch(&self, records: &[LogRecord], meta: &KeyMetadata) -> SiemResult<String> {
        let formatted: SiemResult<Vec<String>> =
            records.iter().map(|r| self.format(r, meta)).collect();
        Ok(formatted?.join("\n"))
    }

    /// Content type handed to the sink
    fn content_type(&self) -> &'static str;
}

/// Get a formatter for the specified output format
pub fn get_formatter(format: OutputFormat) -> Box<dyn EventFormatter> {
    match format {
        OutputFormat::Ndjson => Box::new(NdjsonFormatter),
        OutputFormat::Json | OutputFormat::JsonGz => Box::new(JsonFormatter),
        OutputFormat::Cef => Box::new(CefFormatter),
        OutputFormat::Leef => Box::new(LeefFormatter),
    }
}
