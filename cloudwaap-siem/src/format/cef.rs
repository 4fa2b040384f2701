//! Common Event Format (CEF) encoder
//!
//! Format: `CEF:0|Radware|CloudWAF|1.0|<classId>|<name>|<severity>|<extension>`
//! where the extension is space-joined `key=value` pairs in table order.

use super::EventFormatter;
use super::table::{
    Context, EncodeInput, FieldSource, FieldSpec, Header, MINIMAL, RequestPart, field, spec,
};
use crate::classify::KeyMetadata;
use crate::config::OutputFormat;
use crate::error::SiemResult;
use crate::log_type::LogType;
use crate::record::LogRecord;

const VENDOR: &str = "Radware";
const PRODUCT: &str = "CloudWAF";
const VERSION: &str = "1.0";

const TENANT: FieldSource = FieldSource::ContextOr(Context::Tenant, "tenant_name");
const APPLICATION: FieldSource = FieldSource::ContextOr(Context::Application, "application_name");

const ACCESS: &[FieldSpec] = &[
    field("act", "action"),
    field("dpt", "destination_port"),
    field("dst", "destination_ip"),
    field("dhost", "host"),
    field("app", "protocol"),
    spec("request", FieldSource::Request(RequestPart::Url)),
    spec("requestMethod", FieldSource::Request(RequestPart::Method)),
    spec("rt", FieldSource::DeviceTime),
    field("spt", "source_port"),
    field("src", "source_ip"),
    field("in", "http_bytes_in"),
    field("out", "http_bytes_out"),
    field("requestClientApplication", "user_agent"),
    field("requestContext", "referrer"),
    field("requestCookies", "cookie"),
    field("rdwrCldResponseCode", "response_code"),
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
    field("dpt", "destinationPort"),
    field("dst", "externalIp"),
    field("dhost", "host"),
    field("app", "protocol"),
    spec("request", FieldSource::Request(RequestPart::Url)),
    field("requestMethod", "method"),
    spec("rt", FieldSource::DeviceTime),
    field("spt", "sourcePort"),
    field("src", "sourceIp"),
    field("reason", "title"),
    spec("requestContext", FieldSource::Header(Header::Referer)),
    spec("requestCookies", FieldSource::Header(Header::Cookie)),
    spec("requestClientApplication", FieldSource::Header(Header::UserAgent)),
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
    field("rdwrCldPath", "URI"),
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
    spec("rt", FieldSource::DeviceTime),
    field("src", "ip"),
    field("reason", "violation_reason"),
    field("requestContext", "referrer"),
    field("requestClientApplication", "ua"),
    field("rdwrCldCountryCode", "country_code"),
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
    field("dpt", "destinationPort"),
    field("app", "protocol"),
    spec("rt", FieldSource::DeviceTime),
    field("src", "sourceIP"),
    field("spt", "sourcePort"),
    field("reason", "name"),
    field(
        "rdwrCldCountryCode",
        "enrichmentContainer.geoLocation.countryCode",
    ),
    spec("rdwrCldTenantName", TENANT),
    spec("rdwrCldAppName", APPLICATION),
    field("rdwrCldAppId", "enrichmentContainer.applicationId"),
    field("rdwrCldContractId", "enrichmentContainer.contractId"),
    field("rdwrCldTenantId", "enrichmentContainer.tenant"),
    field("rdwrCldCategory", "category"),
    field("rdwrCldTotalVolume", "totalVolume"),
    field("rdwrCldTotalPackets", "totalPackets"),
    field("rdwrCldID", "ID"),
];

/// Shared with LEEF, which uses the same keys for WebDDoS
pub(crate) const WEB_DDOS: &[FieldSpec] = &[
    field("act", "action"),
    field("dhost", "host"),
    spec(
        "rdwrCldAppName",
        FieldSource::FieldOr("applicationName", Context::Application),
    ),
    field(
        "rdwrCldCountryCode",
        "enrichmentContainer.geoLocation.countryCode",
    ),
    field("rdwrCldContractId", "enrichmentContainer.contractId"),
    field("rdwrCldApplicationId", "enrichmentContainer.applicationId"),
    field("rdwrCldTenantId", "enrichmentContainer.tenant"),
    spec("rdwrCldTenantName", TENANT),
    field("rdwrCldAttackId", "attackID"),
    field("rdwrCldStartTime", "startTime"),
    field("rdwrCldEndTime", "endTime"),
    field("rdwrCldDuration", "Duration"),
    field("rdwrCldAttackVector", "attackVector"),
    field("rdwrCldStatus", "status"),
    field(
        "rdwrCldLrtsAllowedTopOfBufferMisses",
        "latestRealTimeSignature.AllowedTopOfBufferMisses",
    ),
    field(
        "rdwrCldLrtsEligibleHeaders",
        "latestRealTimeSignature.EligibleHeaders",
    ),
    field(
        "rdwrCldLrtsIgnoreHeaders",
        "latestRealTimeSignature.IgnoreHeaders",
    ),
    field(
        "rdwrCldLrtsIsCharacterProb",
        "latestRealTimeSignature.IsCharacterizationProbability",
    ),
    field(
        "rdwrCldLrtsKnownHeaders",
        "latestRealTimeSignature.KnownHeaders",
    ),
    field("rdwrCldLrtsPattern", "latestRealTimeSignature.Pattern"),
    field(
        "rdwrCldDetAppBehavAttackThresh",
        "rdwrCldDetAppBehavAttackThresh",
    ),
    field("rdwrCldRpsInbound", "Rps.Inbound"),
    field("rdwrCldRpsBlocked", "latestRealTimeSignature.Pattern"),
    field("rdwrCldRpsClean", "Rps.clean"),
    field("rdwrCldRpsAttackThresh", "Rps.attackThreshold"),
];

/// Extension table for a log family
pub fn cef_table(log_type: LogType) -> &'static [FieldSpec] {
    match log_type {
        LogType::Access => ACCESS,
        LogType::Waf => WAF,
        LogType::Bot => BOT,
        LogType::Ddos => DDOS,
        LogType::WebDdos => WEB_DDOS,
        LogType::Csp | LogType::Unknown => MINIMAL,
    }
}

/// Render one record as a CEF line.
pub fn encode_cef(record: &LogRecord, meta: &KeyMetadata) -> String {
    let input = EncodeInput::new(record, meta);
    let log_type = meta.log_type;

    let header = format!(
        "CEF:0|{VENDOR}|{PRODUCT}|{VERSION}|{}|{}|{}|",
        log_type.class_id(),
        log_type.event_name(),
        input.severity,
    );

    header + &input.pairs(cef_table(log_type)).join(" ")
}

/// CEF (Common Event Format) formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct CefFormatter;

impl EventFormatter for CefFormatter {
    fn format(&self, record: &LogRecord, meta: &KeyMetadata) -> SiemResult<String> {
        Ok(encode_cef(record, meta))
    }

    fn content_type(&self) -> &'static str {
        OutputFormat::Cef.content_type()
    }
}
