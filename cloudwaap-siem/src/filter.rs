//! Tenant/application scoped inclusion policy

use crate::config::{FilterPolicy, PipelineConfig};
use crate::log_type::LogType;
use crate::record::{LogRecord, RecordExt};

static PERMISSIVE: FilterPolicy = FilterPolicy::PERMISSIVE;

/// Evaluates filter policies from a [`PipelineConfig`]
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine<'a> {
    config: &'a PipelineConfig,
}

impl<'a> FilterEngine<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Policy for an (application, type) pair.
    ///
    /// An application override for the type wins outright, then the default
    /// for the type, then a policy that keeps everything.
    pub fn resolve(&self, application_name: Option<&str>, log_type: LogType) -> &'a FilterPolicy {
        let config = self.config;

        application_name
            .and_then(|app| config.override_policy_by_application.get(app))
            .and_then(|by_type| by_type.get(&log_type))
            .or_else(|| config.default_filter_policy.get(&log_type))
            .unwrap_or(&PERMISSIVE)
    }

    /// Whether a whole object of this (application, type) is processed.
    pub fn allows_file(&self, application_name: Option<&str>, log_type: LogType) -> bool {
        self.resolve(application_name, log_type).enabled
    }

    /// Whether one record survives the resolved policy.
    pub fn should_keep(
        &self,
        record: &LogRecord,
        application_name: Option<&str>,
        log_type: LogType,
    ) -> bool {
        let policy = self.resolve(application_name, log_type);

        if !policy.enabled {
            return false;
        }

        if let Some(action) = record.str_field("action")
            && policy.blocked_actions.contains(action)
        {
            return false;
        }

        if let Some(violation) = record.str_field("violationType")
            && policy.blocked_violation_types.contains(violation)
        {
            return false;
        }

        true
    }
}
