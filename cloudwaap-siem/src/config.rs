//! Pipeline configuration with builder pattern

use crate::error::{SiemError, SiemResult};
use crate::log_type::LogType;
use cloudwaap_config::{ConfigManager, ConfigValidator, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "CLOUDWAAP";

/// Output wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    #[serde(rename = "ndjson")]
    Ndjson,
    /// A single JSON array
    #[serde(rename = "json")]
    Json,
    /// ArcSight Common Event Format, one event per line
    #[serde(rename = "cef")]
    Cef,
    /// QRadar Log Event Extended Format, one event per line
    #[serde(rename = "leef")]
    Leef,
    /// The original compressed object, forwarded untouched
    #[serde(rename = "json.gz")]
    JsonGz,
}

impl OutputFormat {
    /// File extension of produced objects, with the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Ndjson => ".ndjson",
            OutputFormat::Json => ".json",
            OutputFormat::Cef => ".cef",
            OutputFormat::Leef => ".leef",
            OutputFormat::JsonGz => ".json.gz",
        }
    }

    /// Content type handed to the sink
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Ndjson => "application/x-ndjson",
            OutputFormat::Json | OutputFormat::JsonGz | OutputFormat::Cef | OutputFormat::Leef => {
                "application/json; charset=utf-8"
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Ndjson => write!(f, "ndjson"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Cef => write!(f, "cef"),
            OutputFormat::Leef => write!(f, "leef"),
            OutputFormat::JsonGz => write!(f, "json.gz"),
        }
    }
}

/// Inclusion policy for one (application, log type) pair
///
/// Accepts `{"enable": bool, "action": [..], "violationType": [..]}`; absent
/// or empty lists never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPolicy {
    /// Whether records of this type are kept at all
    #[serde(alias = "enable", default = "default_true")]
    pub enabled: bool,

    /// `action` values to drop
    #[serde(rename = "action", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub blocked_actions: BTreeSet<String>,

    /// `violationType` values to drop
    #[serde(
        rename = "violationType",
        default,
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub blocked_violation_types: BTreeSet<String>,
}

fn default_true() -> bool {
    true
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::PERMISSIVE
    }
}

impl FilterPolicy {
    /// Keeps everything
    pub const PERMISSIVE: FilterPolicy = FilterPolicy {
        enabled: true,
        blocked_actions: BTreeSet::new(),
        blocked_violation_types: BTreeSet::new(),
    };

    /// Drops everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::PERMISSIVE
        }
    }

    /// Drop records whose `action` is one of `actions`
    pub fn block_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_actions.extend(actions.into_iter().map(Into::into));
        self
    }

    /// Drop records whose `violationType` is one of `types`
    pub fn block_violation_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_violation_types
            .extend(types.into_iter().map(Into::into));
        self
    }
}

/// How the output key is derived from the input key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixMode {
    /// Append `-<newSuffix>` to the first path segment
    Add,
    /// Strip `-<originalSuffix>` from the first path segment
    #[default]
    Remove,
    /// Leave the first path segment alone
    None,
}

/// Output location options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOptions {
    pub keep_original_folder_structure: bool,
    pub destination_folder: String,
    pub suffix_mode: SuffixMode,
    pub original_suffix: String,
    pub new_suffix: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            keep_original_folder_structure: true,
            destination_folder: String::new(),
            suffix_mode: SuffixMode::Remove,
            original_suffix: "unprocessed".to_string(),
            new_suffix: String::new(),
        }
    }
}

/// Complete, immutable pipeline configuration
///
/// # Examples
///
/// ```
/// use cloudwaap_siem::*;
///
/// let config = PipelineConfig::builder()
///     .output_format(OutputFormat::Cef)
///     .enrich_logs(true)
///     .override_policy("shop", LogType::Waf, FilterPolicy::default().block_actions(["Allowed"]))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.output_format, OutputFormat::Cef);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Apply filter policies
    pub enable_filtering: bool,

    /// Policy per log type
    pub default_filter_policy: HashMap<LogType, FilterPolicy>,

    /// Per-application policies replacing the default for their types
    pub override_policy_by_application: HashMap<String, HashMap<LogType, FilterPolicy>>,

    /// Stamp logType/applicationName/tenantName onto records
    pub enrich_logs: bool,

    /// Output wire format
    pub output_format: OutputFormat,

    /// Applications whose objects are never skipped wholesale
    pub file_skip_exempt_applications: BTreeSet<String>,

    /// Output location options
    pub output: OutputOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let default_filter_policy = [
            LogType::Access,
            LogType::Waf,
            LogType::Bot,
            LogType::Ddos,
            LogType::WebDdos,
            LogType::Csp,
        ]
        .into_iter()
        .map(|t| (t, FilterPolicy::default()))
        .collect();

        Self {
            enable_filtering: true,
            default_filter_policy,
            override_policy_by_application: HashMap::new(),
            enrich_logs: false,
            output_format: OutputFormat::default(),
            file_skip_exempt_applications: BTreeSet::new(),
            output: OutputOptions::default(),
        }
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> cloudwaap_config::Result<()> {
        let output = &self.output;
        ConfigValidator::is_relative_key(&output.destination_folder, "output.destinationFolder")?;
        ConfigValidator::is_segment(&output.original_suffix, "output.originalSuffix")?;
        ConfigValidator::is_segment(&output.new_suffix, "output.newSuffix")?;

        match output.suffix_mode {
            SuffixMode::Add => ConfigValidator::not_empty(&output.new_suffix, "output.newSuffix"),
            SuffixMode::Remove => {
                ConfigValidator::not_empty(&output.original_suffix, "output.originalSuffix")
            }
            SuffixMode::None => Ok(()),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Load from an optional JSON/TOML file, then `CLOUDWAAP_*` variables
    /// (a `.env` file in the working directory is read first when present).
    pub fn load(path: Option<&Path>) -> SiemResult<Self> {
        let mut manager = ConfigManager::with_prefix(ENV_PREFIX);
        if let Some(path) = path {
            manager.load_file(path)?;
        }
        manager.load_dotenv(None)?;
        Ok(manager.load_validated()?)
    }

    /// Deserialize and validate a configuration document.
    pub fn from_value(value: serde_json::Value) -> SiemResult<Self> {
        let mut manager = ConfigManager::new();
        manager.merge(value)?;
        Ok(manager.load_validated()?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> SiemResult<()> {
        Validate::validate(self).map_err(SiemError::from)
    }

    /// Whether an application's objects bypass the file-level skip
    pub fn is_skip_exempt(&self, application_name: Option<&str>) -> bool {
        application_name.is_some_and(|app| self.file_skip_exempt_applications.contains(app))
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a builder starting from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable filtering
    pub fn enable_filtering(mut self, enabled: bool) -> Self {
        self.config.enable_filtering = enabled;
        self
    }

    /// Set the default policy for a log type
    pub fn default_policy(mut self, log_type: LogType, policy: FilterPolicy) -> Self {
        self.config.default_filter_policy.insert(log_type, policy);
        self
    }

    /// Set an application's policy for a log type
    pub fn override_policy(
        mut self,
        application: impl Into<String>,
        log_type: LogType,
        policy: FilterPolicy,
    ) -> Self {
        self.config
            .override_policy_by_application
            .entry(application.into())
            .or_default()
            .insert(log_type, policy);
        self
    }

    /// Enable or disable enrichment
    pub fn enrich_logs(mut self, enabled: bool) -> Self {
        self.config.enrich_logs = enabled;
        self
    }

    /// Set the output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Exempt an application from the file-level skip
    pub fn skip_exempt(mut self, application: impl Into<String>) -> Self {
        self.config
            .file_skip_exempt_applications
            .insert(application.into());
        self
    }

    /// Set the output location options
    pub fn output(mut self, output: OutputOptions) -> Self {
        self.config.output = output;
        self
    }

    /// Write all objects under one folder instead of mirroring the input key
    pub fn destination_folder(mut self, folder: impl Into<String>) -> Self {
        self.config.output.keep_original_folder_structure = false;
        self.config.output.destination_folder = folder.into();
        self
    }

    /// Set how the first key segment is rewritten
    pub fn suffix(mut self, mode: SuffixMode, suffix: impl Into<String>) -> Self {
        self.config.output.suffix_mode = mode;
        match mode {
            SuffixMode::Add => self.config.output.new_suffix = suffix.into(),
            SuffixMode::Remove => self.config.output.original_suffix = suffix.into(),
            SuffixMode::None => {}
        }
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> SiemResult<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
