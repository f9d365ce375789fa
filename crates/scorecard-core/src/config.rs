//! Scorecard configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_EXPORT_PREFIX;
use crate::store::RetentionPolicy;

/// Environment variable overriding `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "SCORECARD_DATA_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorecardConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub records: RecordsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the draft and record files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Optional cap on stored bytes.
    #[serde(default)]
    pub quota_bytes: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            quota_bytes: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./scorecard-data")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Recurring save interval.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Idle time after a text edit before saving.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl AutosaveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_interval_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_interval_ms() -> u64 {
    30_000
}
fn default_debounce_ms() -> u64 {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Soft maximum of saved records.
    #[serde(default = "default_max_saved")]
    pub max_saved: usize,
    #[serde(default)]
    pub retention: RetentionPolicy,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            max_saved: default_max_saved(),
            retention: RetentionPolicy::default(),
        }
    }
}

fn default_max_saved() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_EXPORT_PREFIX.to_string()
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `scorecard.toml` in the current directory
/// 2. `~/.config/scorecard/config.toml`
///
/// Defaults apply when neither exists. `SCORECARD_DATA_DIR` overrides the
/// data directory.
pub fn load_config_from(path: Option<&Path>) -> Result<ScorecardConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("scorecard.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ScorecardConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            config.storage.data_dir = PathBuf::from(dir);
        }
    }

    tracing::debug!(
        source = ?config_path,
        data_dir = %config.storage.data_dir.display(),
        "configuration loaded"
    );
    Ok(config)
}

/// Parse a TOML config string and expand `${VAR}` references.
pub fn parse_config(content: &str) -> Result<ScorecardConfig> {
    let mut config: ScorecardConfig = toml::from_str(content)?;
    let data_dir = config.storage.data_dir.to_string_lossy().into_owned();
    config.storage.data_dir = PathBuf::from(resolve_env_vars(&data_dir));
    config.export.prefix = resolve_env_vars(&config.export.prefix);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("scorecard"))
}

/// Commented starter configuration written by `scorecard init`.
pub const SAMPLE_CONFIG: &str = r#"# scorecard configuration

[storage]
# Directory holding the draft and saved records.
data_dir = "./scorecard-data"
# quota_bytes = 5242880

[autosave]
enabled = true
interval_ms = 30000
debounce_ms = 300

[records]
# Soft limit on saved records; "keep" warns, "evict-oldest" drops the oldest.
max_saved = 100
retention = "keep"

[export]
prefix = "pontuacao-entrevista"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ScorecardConfig::default();
        assert_eq!(config.autosave.interval(), Duration::from_secs(30));
        assert_eq!(config.autosave.debounce(), Duration::from_millis(300));
        assert_eq!(config.records.max_saved, 100);
        assert_eq!(config.records.retention, RetentionPolicy::Keep);
        assert_eq!(config.export.prefix, "pontuacao-entrevista");
    }

    #[test]
    fn sample_config_parses_to_defaults() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, ScorecardConfig::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config = parse_config(
            r#"
[records]
retention = "evict-oldest"
max_saved = 5
"#,
        )
        .unwrap();
        assert_eq!(config.records.retention, RetentionPolicy::EvictOldest);
        assert_eq!(config.records.max_saved, 5);
        assert!(config.autosave.enabled);
    }

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_SCORECARD_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_SCORECARD_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_SCORECARD_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_SCORECARD_TEST_VAR");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/scorecard.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_retention_is_rejected() {
        assert!(parse_config("[records]\nretention = \"forever\"\n").is_err());
    }
}
