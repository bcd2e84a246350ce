//! TOML-based application configuration.
//!
//! Stores:
//! - How to reach the provider (external command or a saved response file)
//! - Default query settings applied when the caller passes no flag
//!
//! Configuration is stored at `~/.config/taskview/config.toml` unless
//! `TASKVIEW_CONFIG` points elsewhere.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::criteria::{FilterCriteria, QuotaMode, TierOrder, DEFAULT_BUDGET};
use crate::error::ConfigError;

/// Returns `~/.config/taskview[-dev]/` based on TASKVIEW_ENV.
///
/// Set TASKVIEW_ENV=dev to use a development config directory.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKVIEW_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("taskview-dev")
    } else {
        base_dir.join("taskview")
    }
}

/// Provider connection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Program that answers a JSON request on stdin with a JSON response on stdout.
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Saved response used instead of the command when set.
    #[serde(default)]
    pub response_file: Option<PathBuf>,
}

/// Query defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_true")]
    pub hide_completed: bool,
    #[serde(default = "default_true")]
    pub hide_recurring_duplicates: bool,
    #[serde(default)]
    pub collapse_duplicates: bool,
    #[serde(default = "default_budget")]
    pub budget: usize,
    #[serde(default)]
    pub tier_order: TierOrder,
    #[serde(default)]
    pub quota_mode: QuotaMode,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_true() -> bool {
    true
}
fn default_budget() -> usize {
    DEFAULT_BUDGET
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            hide_completed: true,
            hide_recurring_duplicates: true,
            collapse_duplicates: false,
            budget: DEFAULT_BUDGET,
            tier_order: TierOrder::default(),
            quota_mode: QuotaMode::default(),
        }
    }
}

impl DefaultsConfig {
    /// Criteria with these defaults and every optional rule unset.
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            hide_completed: self.hide_completed,
            hide_recurring_duplicates: self.hide_recurring_duplicates,
            collapse_duplicates: self.collapse_duplicates,
            budget: self.budget,
            tier_order: self.tier_order,
            quota_mode: self.quota_mode,
            ..FilterCriteria::default()
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Array(_) => serde_json::Value::Array(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| serde_json::Value::String(s.to_string()))
                            .collect(),
                    ),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// `TASKVIEW_CONFIG` if set, otherwise `config.toml` under [`config_dir`].
    pub fn path() -> PathBuf {
        std::env::var_os("TASKVIEW_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir().join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Unknown keys are rejected.
    ///
    /// An empty `provider.response_file` clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;

        if let Some(obj) = json.pointer_mut("/provider").and_then(|v| v.as_object_mut()) {
            if obj.get("response_file").and_then(|v| v.as_str()) == Some("") {
                obj.insert("response_file".into(), serde_json::Value::Null);
            }
        }
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
