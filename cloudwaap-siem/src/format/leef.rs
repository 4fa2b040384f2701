//! Log Event Extended Format (LEEF) encoder
//!
//! Format: `LEEF:2.0|Radware|CloudWAF|1.0|<name>|<devTime>` followed by
//! `\tkey=value` attributes. The delimiter is the two-character escape
//! sequence `\t`, not a tab byte.

use super::EventFormatter;
use super::cef::WEB_DDOS;
use super::table::{
    Context, EncodeInput, FieldSource, FieldSpec, Header, MINIMAL, RequestPart, field, spec,
};
use crate::classify::KeyMetadata;
use crate::config::OutputFormat;
use crate::error::SiemResult;
use crate::log_type::LogType;
use crate::record::LogRecord;

/// Attribute delimiter
pub const LEEF_DELIMITER: &str = "\\t";

const TENANT: FieldSource = FieldSource::ContextOr(Context::Tenant, "tenant_name");
const APPLICATION: FieldSource = FieldSource::ContextOr(Context::Application, "application_name");

const ACCESS: &[FieldSpec] = &[
    field("action", "action"),
    field("dstPort", "destination_port"),
    field("dst", "destination_ip"),
    field("dhost", "host"),
    field("proto", "protocol"),
    spec("url", FieldSource::Request(RequestPart::Url)),
    spec("method", FieldSource::Request(RequestPart::Method)),
    spec("devTime", FieldSource::DeviceTime),
    field("srcPort", "source_port"),
    field("src", "source_ip"),
    field("bytesIn", "http_bytes_in"),
    field("bytesOut", "http_bytes_out"),
    field("userAgent", "user_agent"),
    field("referrer", "referrer"),
    field("cookie", "cookie"),
    field("responseCode", "response_code"),
    field("rdwrCldCountryCode", "country_code"),
    spec(
        "rdwrCldTenantName",
        FieldSource::FieldOr("tenant_name", Context::Tenant),
    ),
    spec(
        "rdwrCldAppName",
        FieldSource::FieldOr("application_name", Context::Application),
    ),
    field("rdwrCldAppId", "application_id"),
    field("rdwrCldRequestTime", "request_time"),
    field("rdwrCldDirectory", "directory"),
    field("rdwrCldAcceptLanguage", "accept_language"),
    field("rdwrCldXff", "x-forwarded-for"),
    spec("rdwrCldHttpVersion", FieldSource::Request(RequestPart::Version)),
];

const WAF: &[FieldSpec] = &[
    field("act", "action"),
    field("dstPort", "destinationPort"),
    field("dst", "externalIp"),
    field("dhost", "host"),
    field("proto", "protocol"),
    spec("request", FieldSource::Request(RequestPart::Url)),
    field("method", "method"),
    spec("devTime", FieldSource::DeviceTime),
    field("srcPort", "sourcePort"),
    field("src", "sourceIp"),
    field("reason", "title"),
    spec("referer", FieldSource::Header(Header::Referer)),
    spec("cookie", FieldSource::Header(Header::Cookie)),
    spec("userAgent", FieldSource::Header(Header::UserAgent)),
    spec("sev", FieldSource::Severity),
    field(
        "rdwrCldCountryCode",
        "enrichmentContainer.geoLocation.countryCode",
    ),
    spec("rdwrCldTenantName", TENANT),
    spec("rdwrCldAppName", APPLICATION),
    field("rdwrCldAppId", "enrichmentContainer.applicationId"),
    field("rdwrCldContractId", "enrichmentContainer.contractId"),
    field("rdwrCldTenantId", "enrichmentContainer.tenant"),
    field("rdwrCldModule", "targetModule"),
    field("rdwrCldWafTransId", "transId"),
    field("rdwrCldPath", "appPath"),
    field("rdwrCldViolationCategory", "violationCategory"),
    field("rdwrCldViolationDetails", "violationDetails"),
    field("rdwrCldViolationType", "violationType"),
    field(
        "rdwrCldThreatCategory",
        "enrichmentContainer.owaspCategory2021",
    ),
    field("rdwrCldParamName", "paramName"),
    field("rdwrCldParamType", "paramType"),
    field("rdwrCldParamValue", "paramValue"),
    field("rdwrCldRuleId", "RuleID"),
];

const BOT: &[FieldSpec] = &[
    field("act", "action"),
    field("dhost", "site"),
    field("request", "url"),
    spec("devTime", FieldSource::DeviceTime),
    field("src", "ip"),
    field("cat", "violation_reason"),
    field("referer", "referrer"),
    field("userAgent", "ua"),
    field(
        "rdwrCldCountryCode",
        "enrichmentContainer.geoLocation.countryCode",
    ),
    spec("rdwrCldTenantName", TENANT),
    spec("rdwrCldAppName", APPLICATION),
    field("rdwrCldTid", "tid"),
    field("rdwrCldStatus", "status"),
    field("rdwrCldBotCategory", "bot_category"),
    field("rdwrCldSessionCookie", "session_cookie"),
    field("rdwrCldHeaders", "headers"),
    field("rdwrCldPolicyId", "policy_id"),
    field("rdwrCldSignaturePattern", "signature_pattern"),
];

const DDOS: &[FieldSpec] = &[
    field("act", "action"),
    field("dst", "destinationIP"),
    field("dstPort", "destinationPort"),
    field("proto", "protocol"),
    spec("devTime", FieldSource::DeviceTime),
    field("src", "sourceIP"),
    field("srcPort", "sourcePort"),
    field("reason", "name"),
    field("cat", "category"),
    field(
        "rdwrCldCountryCode",
        "enrichmentContainer.geoLocation.countryCode",
    ),
    spec("rdwrCldTenantName", TENANT),
    spec("rdwrCldAppName", APPLICATION),
    field("rdwrCldAppId", "enrichmentContainer.applicationId"),
    field("rdwrCldContractId", "enrichmentContainer.contractId"),
    field("rdwrCldTenantId", "enrichmentContainer.tenant"),
    field("rdwrCldTotalVolume", "totalVolume"),
    field("rdwrCldTotalPackets", "totalPackets"),
    field("rdwrCldID", "ID"),
];

/// Attribute table for a log family
pub fn leef_table(log_type: LogType) -> &'static [FieldSpec] {
    match log_type {
        LogType::Access => ACCESS,
        LogType::Waf => WAF,
        LogType::Bot => BOT,
        LogType::Ddos => DDOS,
        LogType::WebDdos => WEB_DDOS,
        LogType::Csp | LogType::Unknown => MINIMAL,
    }
}

/// Render one record as a LEEF line.
pub fn encode_leef(record: &LogRecord, meta: &KeyMetadata) -> String {
    let input = EncodeInput::new(record, meta);
    let log_type = meta.log_type;

    let mut line = format!(
        "LEEF:2.0|Radware|CloudWAF|1.0|{}|{}",
        log_type.event_name(),
        input.device_time.as_deref().unwrap_or_default(),
    );

    for pair in input.pairs(leef_table(log_type)) {
        line.push_str(LEEF_DELIMITER);
        line.push_str(&pair);
    }

    line
}

/// LEEF (Log Event Extended Format) formatter for IBM QRadar
#[derive(Debug, Clone, Copy, Default)]
pub struct LeefFormatter;

impl EventFormatter for LeefFormatter {
    fn format(&self, record: &LogRecord, meta: &KeyMetadata) -> SiemResult<String> {
        Ok(encode_leef(record, meta))
    }

    fn content_type(&self) -> &'static str {
        OutputFormat::Leef.content_type()
    }
}
