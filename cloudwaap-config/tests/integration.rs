//! Integration tests for cloudwaap-config

use cloudwaap_config::*;
use serde::Deserialize;
use std::io::Write;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    output_format: String,
    #[serde(default)]
    enable_filtering: Option<bool>,
    #[serde(default)]
    exempt: Vec<String>,
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.output_format, "outputFormat")?;
        ConfigValidator::is_segment(&self.output_format, "outputFormat")
    }
}

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_toml_file() {
    let file = write_temp(
        ".toml",
        r#"
        outputFormat = "cef"
        enableFiltering = false
        exempt = ["app1"]
        "#,
    );

    let mut manager = ConfigManager::new();
    manager.load_file(file.path()).unwrap();

    let settings: Settings = manager.load_validated().unwrap();
    assert_eq!(settings.output_format, "cef");
    assert_eq!(settings.enable_filtering, Some(false));
    assert_eq!(settings.exempt, vec!["app1".to_string()]);
}

#[test]
fn test_load_json_then_env_overrides() {
    let file = write_temp(".json", r#"{"outputFormat": "ndjson"}"#);

    let mut manager = ConfigManager::with_prefix("CLOUDWAAP");
    manager.load_file(file.path()).unwrap();
    manager
        .load_env_from(vec![
            ("CLOUDWAAP_OUTPUT_FORMAT".to_string(), "json".to_string()),
            ("CLOUDWAAP_ENABLE_FILTERING".to_string(), "true".to_string()),
            ("OTHER_OUTPUT_FORMAT".to_string(), "cef".to_string()),
        ])
        .unwrap();

    let settings: Settings = manager.load_validated().unwrap();
    assert_eq!(settings.output_format, "json");
    assert_eq!(settings.enable_filtering, Some(true));
}

#[test]
fn test_validation_failure_is_reported() {
    let mut manager = ConfigManager::new();
    manager
        .merge(serde_json::json!({ "outputFormat": "json/gz" }))
        .unwrap();

    let result = manager.load_validated::<Settings>();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_missing_file_is_load_error() {
    let mut manager = ConfigManager::new();
    let result = manager.load_file("/nonexistent/cloudwaap/pipeline.json");
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}

#[test]
fn test_env_file_format() {
    let file = write_temp(".env", "OUTPUT_FORMAT=leef\nENABLE_FILTERING=false\n");

    let mut manager = ConfigManager::new();
    manager.load_file(file.path()).unwrap();

    let settings: Settings = manager.deserialize().unwrap();
    assert_eq!(settings.output_format, "leef");
    assert_eq!(settings.enable_filtering, Some(false));
}
