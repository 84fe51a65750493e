use anyhow::{Context, Result};
use directories::UserDirs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::event_log::SUPPORTED_SINKS;

const CONFIG_DIR_NAME: &str = ".action-eventlog";
const CONFIG_FILE_NAME: &str = "config.toml";

// ── Top-level config ──────────────────────────────────────────────

/// Top-level configuration, loaded from `config.toml`.
///
/// Resolution order: `--config` flag → `ACTION_EVENTLOG_CONFIG` env → `~/.action-eventlog/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Diagnostic log filter (`tracing` env-filter syntax) used when `RUST_LOG` is unset. Default: `"warn"`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Where built records are sent (`[event_log]`).
    #[serde(default)]
    pub event_log: EventLogConfig,
}

fn default_log_filter() -> String {
    "warn".into()
}

// ── Event log sink ───────────────────────────────────────────────

/// Event log sink configuration (`[event_log]` section).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EventLogConfig {
    /// "stdout" | "stderr" | "log". Default: `"stdout"`.
    #[serde(default = "default_event_log_sink")]
    pub sink: String,
    /// Pretty-print records written to stdout/stderr. Default: `false` (NDJSON).
    #[serde(default)]
    pub pretty: bool,
    /// Fill `@timestamp` with the logging time when a record has none. Default: `true`.
    #[serde(default = "default_true")]
    pub stamp_timestamp: bool,
}

fn default_event_log_sink() -> String {
    "stdout".into()
}

fn default_true() -> bool {
    true
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            sink: default_event_log_sink(),
            pretty: false,
            stamp_timestamp: true,
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: default_config_path().unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME)),
            log_filter: default_log_filter(),
            event_log: EventLogConfig::default(),
        }
    }
}

fn default_config_path() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("ACTION_EVENTLOG_CONFIG") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    default_config_path()
}

fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load config from `explicit`, or the default location when `None`.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = resolve_config_path(explicit)?;

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            toml::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?
        } else {
            Config::default()
        };
        config.config_path = config_path;

        config.apply_env_overrides();
        config.validate()?;
        tracing::debug!(
            path = %config.config_path.display(),
            sink = %config.event_log.sink,
            "Config loaded"
        );
        Ok(config)
    }

    /// Validate configuration values that would fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            anyhow::bail!("log_filter must not be empty");
        }

        let sink = self.event_log.sink.trim().to_ascii_lowercase();
        if !SUPPORTED_SINKS.contains(&sink.as_str()) {
            anyhow::bail!(
                "event_log.sink '{}' is not supported; expected one of: {}",
                self.event_log.sink,
                SUPPORTED_SINKS.join(", ")
            );
        }

        Ok(())
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        if let Ok(sink) = std::env::var("ACTION_EVENTLOG_SINK") {
            if !sink.is_empty() {
                self.event_log.sink = sink;
            }
        }

        if let Ok(raw) = std::env::var("ACTION_EVENTLOG_PRETTY") {
            match parse_bool_flag(&raw) {
                Some(pretty) => self.event_log.pretty = pretty,
                None if raw.is_empty() => {}
                None => tracing::warn!("Ignoring invalid ACTION_EVENTLOG_PRETTY value: {raw}"),
            }
        }

        if let Ok(filter) = std::env::var("ACTION_EVENTLOG_LOG") {
            if !filter.is_empty() {
                self.log_filter = filter;
            }
        }
    }

    /// Write the config back to `config_path`, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory {}", parent.display())
                })?;
            }
        }
        fs::write(&self.config_path, contents).with_context(|| {
            format!("Failed to write config file {}", self.config_path.display())
        })?;
        Ok(())
    }
}
