use std::{collections::HashMap, collections::HashSet, time::Duration};

use serde::Deserialize;
use serde_json::Value;

use crate::bridge::{ReadinessPolicy, ResolveOptions};

pub(crate) const SETTINGS_SECTION_KEY: &str = "crosslang-analyzer";
const MIN_POLL_INTERVAL_MS: u64 = 10;
const MAX_POLL_INTERVAL_MS: u64 = 2000;
const MAX_READINESS_WAIT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ServerSettings {
    pub(crate) references: ReferencesSettings,
    pub(crate) readiness: ReadinessSettings,
    pub(crate) workspace: WorkspaceSettings,
    pub(crate) logging: LoggingSettings,
}

impl ServerSettings {
    pub(crate) fn from_lsp_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    /// Overlay a configuration payload, either bare or nested under the
    /// `crosslang-analyzer` key. Unknown keys and malformed sections are ignored.
    pub(crate) fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();
        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<ServerSettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }
        merged.normalize();
        merged
    }

    pub(crate) fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            enabled: self.references.enable,
            strict_export: self.references.strict_export,
            readiness: ReadinessPolicy {
                poll_interval: Duration::from_millis(self.readiness.poll_interval_ms),
                max_wait: Duration::from_millis(self.readiness.max_wait_ms),
            },
        }
    }

    fn apply_patch(
        &mut self,
        patch: ServerSettingsPatch,
    ) {
        if let Some(references) = patch.references {
            self.references.apply_patch(references);
        }
        if let Some(readiness) = patch.readiness {
            self.readiness.apply_patch(readiness);
        }
        if let Some(workspace) = patch.workspace {
            self.workspace.apply_patch(workspace);
        }
        if let Some(logging) = patch.logging {
            self.logging.apply_patch(logging);
        }
    }

    fn normalize(&mut self) {
        self.readiness.normalize();
        self.workspace.normalize();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReferencesSettings {
    pub(crate) enable: bool,
    /// Drop function candidates whose export state differs from the source.
    pub(crate) strict_export: bool,
}

impl Default for ReferencesSettings {
    fn default() -> Self {
        Self {
            enable: true,
            strict_export: false,
        }
    }
}

impl ReferencesSettings {
    fn apply_patch(
        &mut self,
        patch: ReferencesSettingsPatch,
    ) {
        if let Some(enable) = patch.enable {
            self.enable = enable;
        }
        if let Some(strict_export) = patch.strict_export {
            self.strict_export = strict_export;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReadinessSettings {
    pub(crate) poll_interval_ms: u64,
    pub(crate) max_wait_ms: u64,
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_wait_ms: 1500,
        }
    }
}

impl ReadinessSettings {
    fn apply_patch(
        &mut self,
        patch: ReadinessSettingsPatch,
    ) {
        if let Some(poll_interval_ms) = patch.poll_interval_ms {
            self.poll_interval_ms = poll_interval_ms;
        }
        if let Some(max_wait_ms) = patch.max_wait_ms {
            self.max_wait_ms = max_wait_ms;
        }
    }

    fn normalize(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self.max_wait_ms = self.max_wait_ms.min(MAX_READINESS_WAIT_MS);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct WorkspaceSettings {
    pub(crate) exclude_paths: Vec<String>,
}

impl WorkspaceSettings {
    fn apply_patch(
        &mut self,
        patch: WorkspaceSettingsPatch,
    ) {
        if let Some(exclude_paths) = patch.exclude_paths {
            self.exclude_paths = exclude_paths;
        }
    }

    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.exclude_paths = self
            .exclude_paths
            .iter()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .filter(|path| seen.insert(path.clone()))
            .collect();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct LoggingSettings {
    pub(crate) level: LoggingLevel,
}

impl LoggingSettings {
    fn apply_patch(
        &mut self,
        patch: LoggingSettingsPatch,
    ) {
        if let Some(level) = patch.level {
            self.level = level;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub(crate) fn allows_info(self) -> bool {
        self >= LoggingLevel::Info
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ServerSettingsPatch {
    references: Option<ReferencesSettingsPatch>,
    readiness: Option<ReadinessSettingsPatch>,
    workspace: Option<WorkspaceSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ReferencesSettingsPatch {
    enable: Option<bool>,
    strict_export: Option<bool>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ReadinessSettingsPatch {
    poll_interval_ms: Option<u64>,
    max_wait_ms: Option<u64>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct WorkspaceSettingsPatch {
    exclude_paths: Option<Vec<String>>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct LoggingSettingsPatch {
    level: Option<LoggingLevel>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = vec![payload.clone()];
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

#[cfg(test)]
#[path = "../../tests/src/server/settings_tests.rs"]
mod tests;
