use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::filtering::{FilterInfo, Predicate};
use crate::domain::telemetry::TelemetryKind;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};

// =============================================================================
// Malformed Value Policy Enum
// =============================================================================

/// How the check command treats records whose field value cannot be interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Abort the run with an error
    #[default]
    Fail,
    /// Drop the record
    Skip,
    /// Emit the record as if it matched
    Keep,
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedPolicy::Fail => write!(f, "fail"),
            MalformedPolicy::Skip => write!(f, "skip"),
            MalformedPolicy::Keep => write!(f, "keep"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Rule section; every key is optional so CLI flags can complete it
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFileConfig {
    pub field_name: Option<String>,
    pub predicate: Option<Predicate>,
    pub comparand: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub rule: Option<RuleFileConfig>,
    pub telemetry_type: Option<TelemetryKind>,
    pub on_malformed: Option<MalformedPolicy>,
    pub input: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Names of keys that matched no known setting
    fn unknown_fields(&self) -> Vec<String> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(rule) = other.rule {
            let current = self.rule.get_or_insert_with(RuleFileConfig::default);
            if rule.field_name.is_some() {
                tracing::trace!(field_name = ?rule.field_name, "Merging rule.fieldName");
                current.field_name = rule.field_name;
            }
            if rule.predicate.is_some() {
                tracing::trace!(predicate = ?rule.predicate, "Merging rule.predicate");
                current.predicate = rule.predicate;
            }
            if rule.comparand.is_some() {
                tracing::trace!(comparand = ?rule.comparand, "Merging rule.comparand");
                current.comparand = rule.comparand;
            }
        }

        if other.telemetry_type.is_some() {
            tracing::trace!(telemetry_type = ?other.telemetry_type, "Merging telemetryType");
            self.telemetry_type = other.telemetry_type;
        }
        if other.on_malformed.is_some() {
            tracing::trace!(on_malformed = ?other.on_malformed, "Merging onMalformed");
            self.on_malformed = other.on_malformed;
        }
        if other.input.is_some() {
            tracing::trace!(input = ?other.input, "Merging input");
            self.input = other.input;
        }
    }
}

// =============================================================================
// Application Config (resolved)
// =============================================================================

/// Rule as assembled from config files and CLI flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig {
    pub field_name: Option<String>,
    pub predicate: Option<Predicate>,
    pub comparand: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telemetry_type: Option<TelemetryKind>,
    pub rule: RuleConfig,
    pub on_malformed: MalformedPolicy,
    /// JSON-lines input; stdin when `None`
    pub input: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.telefilter/telefilter.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut paths = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            paths.push(profile_path);
        }

        if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            paths.push(expanded);
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                paths.push(local);
            }
        }

        Self::load_layers(&paths, cli)
    }

    /// Merge config files in order, then apply CLI overrides
    pub fn load_layers(paths: &[PathBuf], cli: &CliConfig) -> Result<Self> {
        let mut file_config = FileConfig::default();
        for path in paths {
            let layer = FileConfig::load_from_file(path)?;
            layer.warn_unknown_fields();
            file_config.merge(layer);
        }
        tracing::debug!(configs = ?paths, "Config files loaded");

        let file_rule = file_config.rule.unwrap_or_default();

        let rule = RuleConfig {
            field_name: cli.field.clone().or(file_rule.field_name),
            predicate: cli.predicate.or(file_rule.predicate),
            comparand: cli.comparand.clone().or(file_rule.comparand),
        };

        let input = cli
            .input
            .clone()
            .or_else(|| file_config.input.map(|p| expand_path(&p)));

        Ok(Self {
            telemetry_type: cli.telemetry_type.or(file_config.telemetry_type),
            rule,
            on_malformed: cli
                .on_malformed
                .or(file_config.on_malformed)
                .unwrap_or_default(),
            input,
        })
    }

    pub fn telemetry_type(&self) -> Result<TelemetryKind> {
        self.telemetry_type.context(
            "No telemetry type configured (use --type or \"telemetryType\" in the config file)",
        )
    }

    /// Rule to compile. Field name and comparand are passed through as found
    /// so the filter engine reports their absence itself.
    pub fn filter_info(&self) -> Result<FilterInfo> {
        let predicate = self.rule.predicate.context(
            "No predicate configured (use --predicate or \"rule.predicate\" in the config file)",
        )?;
        Ok(FilterInfo {
            field_name: self.rule.field_name.clone().unwrap_or_default(),
            predicate,
            comparand: self.rule.comparand.clone(),
        })
    }
}

/// Get the profile config path (~/.telefilter/telefilter.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
