//! Integration tests for common normalizer workflows.
//!
//! These tests run whole objects through the pipeline the way a deployment
//! does: gzip-compressed exports in, one converted object out.

use cloudwaap::prelude::*;
use serde_json::{Value, json};

const BOT_KEY: &str = "tenantA/logs/Bot/rdwr_event_tenantA_app1_20240101H000000.json.gz";
const WAF_KEY: &str = "tenantA/logs/WAF/rdwr_event_tenantA_app1_20240101H000000.json.gz";
const ACCESS_KEY: &str = "tenantA/logs/Access/rdwr_log_20240101H000000.json.gz";

fn gz(value: &Value) -> Vec<u8> {
    cloudwaap_compression::gzip(value.to_string().as_bytes()).unwrap()
}

async fn run(config: PipelineConfig, key: &str, records: Value) -> (ProcessReport, String) {
    let store = MemoryStore::new();
    store.insert(key, gz(&records)).await;

    let pipeline = Pipeline::new(config, store.clone(), store.clone());
    let report = pipeline.process(key).await.unwrap();

    let body = match &report.output_key {
        Some(output_key) => {
            let object = store.get(output_key).await.unwrap();
            String::from_utf8(object.data.to_vec()).unwrap()
        }
        None => String::new(),
    };

    (report, body)
}

fn cef_config() -> PipelineConfig {
    PipelineConfig::builder()
        .output_format(OutputFormat::Cef)
        .build()
        .unwrap()
}

// =============================================================================
// CEF Workflows
// =============================================================================

#[tokio::test]
async fn test_bot_object_to_cef() {
    let config = PipelineConfig::builder()
        .enable_filtering(false)
        .output_format(OutputFormat::Cef)
        .build()
        .unwrap();

    let (report, body) = run(
        config,
        BOT_KEY,
        json!([{ "action": "Block", "time": "1700000000" }]),
    )
    .await;

    assert_eq!(report.outcome, ProcessOutcome::Written);
    assert_eq!(report.log_type, LogType::Bot);
    assert_eq!(body.lines().count(), 1);
    assert!(body.starts_with("CEF:0|Radware|CloudWAF|1.0|3|BotLog|3|"));
    assert!(body.contains("act=Block"));
    assert!(body.contains("rt=1700000000"));
    assert!(body.contains("rdwrCldTenantName=tenantA"));
    assert!(body.contains("rdwrCldAppName=app1"));
}

#[tokio::test]
async fn test_waf_critical_keeps_cookie_pairs() {
    let (_, body) = run(
        cef_config(),
        WAF_KEY,
        json!([{
            "action": "Block",
            "severity": "Critical",
            "request": "GET /x HTTP/1.1\r\nCookie: a=b\r\n",
            "protocol": "https",
            "host": "h"
        }]),
    )
    .await;

    let header: Vec<&str> = body.splitn(8, '|').collect();
    assert_eq!(header[6], "10");
    assert!(body.contains("requestCookies=a=b"));
    assert!(body.contains("request=https://h/x"));
}

#[tokio::test]
async fn test_access_severity_follows_action() {
    let (_, body) = run(
        cef_config(),
        ACCESS_KEY,
        json!([
            { "action": "Blocked", "tenant_name": "tenantA", "application_name": "app1" },
            { "action": "Allowed", "tenant_name": "tenantA", "application_name": "app1" }
        ]),
    )
    .await;

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("CEF:0|Radware|CloudWAF|1.0|1|AccessLog|3|"));
    assert!(lines[1].starts_with("CEF:0|Radware|CloudWAF|1.0|1|AccessLog|2|"));
}

// =============================================================================
// Filtering Workflows
// =============================================================================

#[tokio::test]
async fn test_application_override_is_scoped() {
    let config = || {
        PipelineConfig::builder()
            .override_policy(
                "app1",
                LogType::Access,
                FilterPolicy::default().block_actions(["Blocked"]),
            )
            .build()
            .unwrap()
    };

    let (app1, body) = run(
        config(),
        ACCESS_KEY,
        json!([{ "action": "Blocked", "tenant_name": "tenantA", "application_name": "app1" }]),
    )
    .await;
    assert_eq!((app1.kept, app1.dropped), (0, 1));
    assert_eq!(body, "");

    let (app2, body) = run(
        config(),
        ACCESS_KEY,
        json!([{ "action": "Blocked", "tenant_name": "tenantA", "application_name": "app2" }]),
    )
    .await;
    assert_eq!((app2.kept, app2.dropped), (1, 0));
    assert_eq!(
        body,
        "{\"action\": \"Blocked\", \"tenant_name\": \"tenantA\", \"application_name\": \"app2\"}"
    );
}

#[tokio::test]
async fn test_disabled_type_skips_object() {
    let config = PipelineConfig::builder()
        .default_policy(LogType::Waf, FilterPolicy::disabled())
        .build()
        .unwrap();

    let (report, body) = run(config, WAF_KEY, json!([{ "action": "Block" }])).await;
    assert_eq!(report.outcome, ProcessOutcome::Skipped);
    assert!(body.is_empty());
}

// =============================================================================
// Batch Serialization
// =============================================================================

#[tokio::test]
async fn test_ndjson_and_json_batches() {
    let records = json!([{ "a": 1 }, { "a": 2 }]);

    let (report, ndjson) = run(PipelineConfig::default(), BOT_KEY, records.clone()).await;
    assert_eq!(ndjson, "{\"a\": 1}\n{\"a\": 2}");
    assert_eq!(report.content_type, Some("application/x-ndjson"));

    let json_config = PipelineConfig::builder()
        .output_format(OutputFormat::Json)
        .build()
        .unwrap();
    let (report, json) = run(json_config, BOT_KEY, records).await;
    assert_eq!(json, "[{\"a\": 1}, {\"a\": 2}]");
    assert_eq!(report.content_type, Some("application/json; charset=utf-8"));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cloudwaap.toml");
    std::fs::write(
        &path,
        r#"
enableFiltering = true
enrichLogs = true
outputFormat = "leef"

[overridePolicyByApplication.app1.WAF]
enable = true
action = ["Reported"]
"#,
    )
    .unwrap();

    let config = PipelineConfig::load(Some(path.as_path())).unwrap();
    assert!(config.enrich_logs);
    assert_eq!(config.output_format, OutputFormat::Leef);
    assert!(
        config.override_policy_by_application["app1"][&LogType::Waf]
            .blocked_actions
            .contains("Reported")
    );
}
