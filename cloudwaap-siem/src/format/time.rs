//! Event timestamps
//!
//! Each family stamps time differently: Access uses an Apache-style string,
//! DDoS a day-first local string, Bot an epoch number, WAF and WebDDoS carry
//! epoch values that are passed through.

use crate::log_type::LogType;
use crate::record::{LogRecord, RecordExt};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

const ACCESS_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";
const DDOS_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// `10/Oct/2023:13:55:36 +0000` as epoch milliseconds
pub fn access_epoch_millis(value: &str) -> Option<i64> {
    DateTime::parse_from_str(value, ACCESS_FORMAT)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| debug!(time = %value, error = %e, "Unparseable access timestamp"))
        .ok()
}

/// `10-10-2023 13:55:36` (UTC) as epoch seconds
pub fn ddos_epoch_seconds(value: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(value, DDOS_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| debug!(time = %value, error = %e, "Unparseable DDoS timestamp"))
        .ok()
}

/// Epoch number or numeric string, truncated to whole units
pub fn truncated_epoch(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Device time of a record, as rendered in `rt`/`devTime` and the LEEF header
pub fn device_time(log_type: LogType, record: &LogRecord) -> Option<String> {
    match log_type {
        LogType::Access => record
            .str_field("time")
            .and_then(access_epoch_millis)
            .map(|ms| ms.to_string()),
        LogType::Ddos => record
            .str_field("time")
            .and_then(ddos_epoch_seconds)
            .map(|s| s.to_string()),
        LogType::Bot => record
            .get("time")
            .and_then(truncated_epoch)
            .map(|s| s.to_string()),
        LogType::Waf => record
            .text("receivedTimeStamp")
            .or_else(|| record.text("Time")),
        LogType::WebDdos => record.text("time").or_else(|| record.text("startTime")),
        LogType::Csp | LogType::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_access_epoch_millis() {
        assert_eq!(
            access_epoch_millis("01/Jan/2024:00:00:00 +0000"),
            Some(1_704_067_200_000)
        );
        assert_eq!(
            access_epoch_millis("01/Jan/2024:02:00:00 +0200"),
            Some(1_704_067_200_000)
        );
        assert_eq!(access_epoch_millis("2024-01-01T00:00:00Z"), None);
    }

    #[test]
    fn test_ddos_epoch_seconds() {
        assert_eq!(ddos_epoch_seconds("01-01-2024 00:00:00"), Some(1_704_067_200));
        assert_eq!(ddos_epoch_seconds("2024-01-01 00:00:00"), None);
    }

    #[test]
    fn test_truncated_epoch() {
        assert_eq!(truncated_epoch(&json!("1700000000")), Some(1_700_000_000));
        assert_eq!(truncated_epoch(&json!(1700000000.9)), Some(1_700_000_000));
        assert_eq!(truncated_epoch(&json!(" 17.2 ")), Some(17));
        assert_eq!(truncated_epoch(&json!("soon")), None);
        assert_eq!(truncated_epoch(&json!(null)), None);
    }

    #[test]
    fn test_device_time_per_type() {
        let rec = json!({
            "time": "1700000000",
            "receivedTimeStamp": 1700000000123u64,
            "Time": "ignored",
            "startTime": "1699999999"
        });
        let rec = rec.as_object().unwrap();

        assert_eq!(device_time(LogType::Bot, rec).as_deref(), Some("1700000000"));
        assert_eq!(device_time(LogType::Waf, rec).as_deref(), Some("1700000000123"));
        assert_eq!(device_time(LogType::WebDdos, rec).as_deref(), Some("1700000000"));
        assert_eq!(device_time(LogType::Access, rec), None);
        assert_eq!(device_time(LogType::Csp, rec), None);

        let waf = json!({ "Time": "1700000001" });
        assert_eq!(
            device_time(LogType::Waf, waf.as_object().unwrap()).as_deref(),
            Some("1700000001")
        );
        let web = json!({ "startTime": 5 });
        assert_eq!(
            device_time(LogType::WebDdos, web.as_object().unwrap()).as_deref(),
            Some("5")
        );
    }
}
