//! Ordered field tables shared by the CEF and LEEF encoders
//!
//! Each (wire format, log type) pair is a static list of output keys and
//! where their values come from. One renderer walks the list in order,
//! skips empty values and sanitizes the rest.

use super::request::{RequestLine, WafRequest};
use super::sanitize::{sanitize, sanitize_header};
use super::time::device_time;
use crate::classify::KeyMetadata;
use crate::flatten::LogFlattener;
use crate::log_type::LogType;
use crate::record::{LogRecord, RecordExt};
use crate::severity::SeverityMapper;

/// Names known from the object key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Tenant,
    Application,
}

/// Part of the parsed request line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPart {
    Method,
    Url,
    Version,
}

/// Header extracted from a WAF raw request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Cookie,
    UserAgent,
    Referer,
}

/// Where an output value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Dotted path in the flattened record
    Field(&'static str),
    /// Record path first, key metadata when the record has nothing
    FieldOr(&'static str, Context),
    /// Key metadata first, record path when the key has nothing
    ContextOr(Context, &'static str),
    /// Parsed request line
    Request(RequestPart),
    /// WAF request header, sanitized without the `=` rule
    Header(Header),
    /// Family-specific event time
    DeviceTime,
    /// Mapped severity
    Severity,
}

/// One `key=value` slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub source: FieldSource,
}

pub(crate) const fn field(key: &'static str, path: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        source: FieldSource::Field(path),
    }
}

pub(crate) const fn spec(key: &'static str, source: FieldSource) -> FieldSpec {
    FieldSpec { key, source }
}

/// Everything the table sources read, computed once per record
#[derive(Debug, Clone)]
pub struct EncodeInput<'a> {
    pub log_type: LogType,
    pub meta: &'a KeyMetadata,
    pub flat: LogRecord,
    pub request: Option<RequestLine>,
    pub headers: WafRequest,
    pub device_time: Option<String>,
    pub severity: &'static str,
}

impl<'a> EncodeInput<'a> {
    pub fn new(record: &LogRecord, meta: &'a KeyMetadata) -> Self {
        let log_type = meta.log_type;
        let flat = LogFlattener::flatten(record, log_type);

        let (request, headers) = match (log_type, record.str_field("request")) {
            (LogType::Access, Some(raw)) | (LogType::Waf, Some(raw)) => {
                let protocol = record.text_or_empty("protocol");
                let host = record.text_or_empty("host");
                let waf = WafRequest::parse(raw, &protocol, &host);
                let headers = if log_type == LogType::Waf {
                    WafRequest {
                        line: None,
                        ..waf.clone()
                    }
                } else {
                    WafRequest::default()
                };
                (waf.line, headers)
            }
            _ => (None, WafRequest::default()),
        };

        Self {
            log_type,
            meta,
            device_time: device_time(log_type, record),
            severity: SeverityMapper::for_record(log_type, record),
            flat,
            request,
            headers,
        }
    }

    fn context(&self, ctx: Context) -> Option<String> {
        let value = match ctx {
            Context::Tenant => Some(self.meta.tenant_name.as_str()),
            Context::Application => self.meta.application_name.as_deref(),
        };
        value.filter(|v| !v.is_empty()).map(str::to_string)
    }

    fn request_part(&self, part: RequestPart) -> Option<String> {
        let line = self.request.as_ref()?;
        Some(match part {
            RequestPart::Method => line.method.clone(),
            RequestPart::Url => line.url.clone(),
            RequestPart::Version => line.version.clone(),
        })
    }

    /// Resolve and sanitize a source; `None` for missing, empty or `-`.
    pub fn value(&self, source: FieldSource) -> Option<String> {
        let raw = match source {
            FieldSource::Field(path) => self.flat.text(path),
            FieldSource::FieldOr(path, ctx) => self
                .flat
                .text(path)
                .filter(|v| !is_blank(v))
                .or_else(|| self.context(ctx)),
            FieldSource::ContextOr(ctx, path) => self.context(ctx).or_else(|| self.flat.text(path)),
            FieldSource::Request(part) => self.request_part(part),
            FieldSource::Header(header) => {
                let value = match header {
                    Header::Cookie => self.headers.cookie.as_deref(),
                    Header::UserAgent => self.headers.user_agent.as_deref(),
                    Header::Referer => self.headers.referer.as_deref(),
                };
                return value.filter(|v| !is_blank(v)).map(sanitize_header);
            }
            FieldSource::DeviceTime => self.device_time.clone(),
            FieldSource::Severity => Some(self.severity.to_string()),
        };

        raw.filter(|v| !is_blank(v)).map(|v| sanitize(&v))
    }

    /// `key=value` pairs of a table, in table order.
    pub fn pairs(&self, table: &[FieldSpec]) -> Vec<String> {
        table
            .iter()
            .filter_map(|spec| {
                self.value(spec.source)
                    .map(|value| format!("{}={}", spec.key, value))
            })
            .collect()
    }
}

fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "-"
}

/// Table for families without a dedicated mapping
pub(crate) const MINIMAL: &[FieldSpec] = &[
    field("act", "action"),
    spec(
        "rdwrCldTenantName",
        FieldSource::ContextOr(Context::Tenant, "tenant_name"),
    ),
    spec(
        "rdwrCldAppName",
        FieldSource::ContextOr(Context::Application, "application_name"),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(log_type: LogType) -> KeyMetadata {
        KeyMetadata {
            log_type,
            tenant_name: "tenantA".to_string(),
            application_name: Some("app1".to_string()),
        }
    }

    #[test]
    fn test_skip_rule() {
        let rec = json!({ "a": "", "b": "-", "c": null, "d": 0, "e": false });
        let meta = meta(LogType::Unknown);
        let input = EncodeInput::new(rec.as_object().unwrap(), &meta);

        assert_eq!(input.value(FieldSource::Field("a")), None);
        assert_eq!(input.value(FieldSource::Field("b")), None);
        assert_eq!(input.value(FieldSource::Field("c")), None);
        assert_eq!(input.value(FieldSource::Field("missing")), None);
        assert_eq!(input.value(FieldSource::Field("d")).as_deref(), Some("0"));
        assert_eq!(input.value(FieldSource::Field("e")).as_deref(), Some("false"));
    }

    #[test]
    fn test_context_precedence() {
        let rec = json!({ "tenant_name": "fromRecord", "applicationName": "-" });
        let meta = meta(LogType::WebDdos);
        let input = EncodeInput::new(rec.as_object().unwrap(), &meta);

        assert_eq!(
            input
                .value(FieldSource::ContextOr(Context::Tenant, "tenant_name"))
                .as_deref(),
            Some("tenantA")
        );
        assert_eq!(
            input
                .value(FieldSource::FieldOr("applicationName", Context::Application))
                .as_deref(),
            Some("app1")
        );

        let unnamed = KeyMetadata::unknown();
        let input = EncodeInput::new(rec.as_object().unwrap(), &unnamed);
        assert_eq!(
            input
                .value(FieldSource::ContextOr(Context::Tenant, "tenant_name"))
                .as_deref(),
            Some("fromRecord")
        );
    }

    #[test]
    fn test_waf_headers_only_for_waf() {
        let rec = json!({
            "request": "GET /x HTTP/1.1\r\nCookie: a=b\r\n",
            "protocol": "https",
            "host": "h"
        });
        let waf = meta(LogType::Waf);
        let input = EncodeInput::new(rec.as_object().unwrap(), &waf);
        assert_eq!(input.value(FieldSource::Header(Header::Cookie)).as_deref(), Some("a=b"));
        assert_eq!(
            input.value(FieldSource::Request(RequestPart::Url)).as_deref(),
            Some("https://h/x")
        );

        let access = meta(LogType::Access);
        let input = EncodeInput::new(rec.as_object().unwrap(), &access);
        assert_eq!(input.value(FieldSource::Header(Header::Cookie)), None);
        assert_eq!(
            input.value(FieldSource::Request(RequestPart::Method)).as_deref(),
            Some("GET")
        );
    }

    #[test]
    fn test_values_are_sanitized() {
        let rec = json!({ "title": "a=b\r\nc" });
        let meta = meta(LogType::Waf);
        let input = EncodeInput::new(rec.as_object().unwrap(), &meta);
        assert_eq!(input.pairs(&[field("reason", "title")]), vec!["reason=a b ; c"]);
    }
}
