//! Severity scalars for CEF headers and the LEEF `sev` attribute

use crate::log_type::LogType;
use crate::record::{LogRecord, RecordExt};
use tracing::debug;

/// Maps a record to its numeric severity
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityMapper;

impl SeverityMapper {
    /// Severity of a record. Access reads `action`, WAF reads `severity`.
    pub fn for_record(log_type: LogType, record: &LogRecord) -> &'static str {
        match log_type {
            LogType::Access => Self::access(record.str_field("action")),
            LogType::Waf => Self::waf(record.str_field("severity")),
            other => Self::constant(other),
        }
    }

    /// "3" for blocked requests, "2" otherwise
    pub fn access(action: Option<&str>) -> &'static str {
        if action == Some("Blocked") { "3" } else { "2" }
    }

    /// WAF severity names on the 0-10 CEF scale
    pub fn waf(severity: Option<&str>) -> &'static str {
        match severity {
            Some("Critical") => "10",
            Some("High") => "8",
            Some("Warning") => "5",
            Some("Low") => "3",
            Some("Info") => "1",
            other => {
                debug!(severity = ?other, "Unrecognized WAF severity");
                "0"
            }
        }
    }

    /// Fixed severity of families without a per-record signal
    pub fn constant(log_type: LogType) -> &'static str {
        match log_type {
            LogType::Bot | LogType::Ddos => "3",
            LogType::WebDdos => "10",
            _ => "0",
        }
    }
}
