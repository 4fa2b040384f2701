//! Flattened views of nested records
//!
//! Every family nests enrichment data under `enrichmentContainer`; WebDDoS
//! additionally nests signature, detection and rate data. Encoders read the
//! flattened view, where those containers are re-keyed as
//! `container.child` entries.

use crate::log_type::LogType;
use crate::record::{LogRecord, value_text};
use serde_json::Value;

const ENRICHMENT: &str = "enrichmentContainer";
const SIGNATURE: &str = "latestRealTimeSignature";
const DETECTION: &str = "detection";
const RPS: &str = "rps";

const HEADER_LISTS: [&str; 3] = [
    "latestRealTimeSignature.EligibleHeaders",
    "latestRealTimeSignature.IgnoreHeaders",
    "latestRealTimeSignature.KnownHeaders",
];

/// Builds flattened views. Never fails; missing containers are empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFlattener;

impl LogFlattener {
    /// Flatten a record according to its family's rules.
    pub fn flatten(record: &LogRecord, log_type: LogType) -> LogRecord {
        let flat = hoist(record, ENRICHMENT, 1);

        if log_type != LogType::WebDdos {
            return flat;
        }

        let flat = hoist(&flat, SIGNATURE, 1);
        let flat = hoist(&flat, DETECTION, 2);
        let mut flat = hoist(&flat, RPS, 1);

        if let Some(pattern) = record.get(SIGNATURE).and_then(|s| s.get("Pattern")) {
            flat.insert(
                format!("{SIGNATURE}.Pattern"),
                Value::String(flatten_pattern(pattern)),
            );
        }

        for key in HEADER_LISTS {
            if let Some(Value::Array(items)) = flat.get(key) {
                let joined = join_values(items);
                flat.insert(key.to_string(), Value::String(joined));
            }
        }

        flat
    }
}

/// Copy `record` without `container`, appending its children as
/// `container.child`. With `depth == 2`, children that are objects are opened
/// one more level (`container.child.grandchild`).
fn hoist(record: &LogRecord, container: &str, depth: u8) -> LogRecord {
    let mut flat: LogRecord = record
        .iter()
        .filter(|(k, _)| k.as_str() != container)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let Some(Value::Object(children)) = record.get(container) else {
        return flat;
    };

    for (key, value) in children {
        match value {
            Value::Object(grandchildren) if depth > 1 => {
                for (sub_key, sub_value) in grandchildren {
                    flat.insert(format!("{container}.{key}.{sub_key}"), sub_value.clone());
                }
            }
            _ => {
                flat.insert(format!("{container}.{key}"), value.clone());
            }
        }
    }

    flat
}

/// `[{Name, Values}]` as `"Name1: v1, v2; Name2: v3"`; anything else is empty.
pub fn flatten_pattern(pattern: &Value) -> String {
    let Value::Array(items) = pattern else {
        return String::new();
    };

    items
        .iter()
        .map(|item| {
            let name = item.get("Name").and_then(value_text).unwrap_or_default();
            let values = match item.get("Values") {
                Some(Value::Array(values)) => join_values(values),
                _ => String::new(),
            };
            format!("{name}: {values}")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .filter_map(value_text)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> LogRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_enrichment_container_hoisted() {
        let rec = record(json!({
            "action": "Blocked",
            "enrichmentContainer": {
                "tenant": "t-1",
                "geoLocation": { "countryCode": "US" }
            }
        }));

        let flat = LogFlattener::flatten(&rec, LogType::Waf);
        assert!(!flat.contains_key("enrichmentContainer"));
        assert_eq!(flat["enrichmentContainer.tenant"], "t-1");
        assert_eq!(
            flat["enrichmentContainer.geoLocation"],
            json!({ "countryCode": "US" })
        );
        assert_eq!(flat["action"], "Blocked");
    }

    #[test]
    fn test_every_enrichment_key_is_prefixed_unchanged() {
        let container = json!({ "a": 1, "b": [1, 2], "c": { "d": null }, "e": "x" });
        let rec = record(json!({ "enrichmentContainer": container.clone() }));
        let flat = LogFlattener::flatten(&rec, LogType::Bot);

        for (key, value) in container.as_object().unwrap() {
            assert_eq!(&flat[&format!("enrichmentContainer.{key}")], value);
        }
        assert_eq!(flat.len(), 4);
    }

    #[test]
    fn test_missing_or_scalar_container() {
        let flat = LogFlattener::flatten(&record(json!({ "x": 1 })), LogType::Waf);
        assert_eq!(flat, record(json!({ "x": 1 })));

        let flat = LogFlattener::flatten(
            &record(json!({ "enrichmentContainer": "oops" })),
            LogType::Waf,
        );
        assert!(flat.is_empty());
    }

    #[test]
    fn test_webddos_containers() {
        let rec = record(json!({
            "action": "Mitigating",
            "detection": {
                "ApplicationBehavior": { "attackThreshold": 500 },
                "mode": "auto"
            },
            "rps": { "inbound": 1200, "blocked": 900 },
            "latestRealTimeSignature": {
                "Pattern": [
                    { "Name": "UA", "Values": ["curl", "wget"] },
                    { "Name": "Path", "Values": ["/login"] }
                ],
                "EligibleHeaders": ["Host", "Accept"],
                "KnownHeaders": [],
                "IgnoreHeaders": "already-flat",
                "AllowedTopOfBufferMisses": 3
            }
        }));

        let flat = LogFlattener::flatten(&rec, LogType::WebDdos);
        assert_eq!(flat["detection.ApplicationBehavior.attackThreshold"], 500);
        assert_eq!(flat["detection.mode"], "auto");
        assert_eq!(flat["rps.inbound"], 1200);
        assert_eq!(
            flat["latestRealTimeSignature.Pattern"],
            "UA: curl, wget; Path: /login"
        );
        assert_eq!(flat["latestRealTimeSignature.EligibleHeaders"], "Host, Accept");
        assert_eq!(flat["latestRealTimeSignature.KnownHeaders"], "");
        assert_eq!(flat["latestRealTimeSignature.IgnoreHeaders"], "already-flat");
        assert_eq!(flat["latestRealTimeSignature.AllowedTopOfBufferMisses"], 3);
        assert!(!flat.contains_key("detection"));
        assert!(!flat.contains_key("rps"));
        assert!(!flat.contains_key("latestRealTimeSignature"));
    }

    #[test]
    fn test_non_webddos_keeps_other_containers() {
        let rec = record(json!({ "rps": { "inbound": 1 } }));
        let flat = LogFlattener::flatten(&rec, LogType::Ddos);
        assert_eq!(flat["rps"], json!({ "inbound": 1 }));
    }

    #[test]
    fn test_flatten_pattern_shapes() {
        assert_eq!(flatten_pattern(&json!("nope")), "");
        assert_eq!(flatten_pattern(&json!([])), "");
        assert_eq!(flatten_pattern(&json!([{ "Name": "X" }])), "X: ");
    }
}
