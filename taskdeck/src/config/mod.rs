//! Configuration system for the `taskdeck` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskdeck/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use taskdeck_proto::{Priority, TaskStatus};

use crate::card::{DEFAULT_DATE_FORMAT, DEFAULT_PREVIEW_LEN};
use crate::filter::{Filter, FilterState};
use crate::net::DEFAULT_CHANNEL_CAPACITY;

/// Default API root of the task service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    ui: UiFileConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    channel_capacity: Option<usize>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    date_format: Option<String>,
    datetime_format: Option<String>,
    description_preview_len: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // -- API --
    /// API root of the task service.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Capacity of the worker's command/event channels.
    pub channel_capacity: usize,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Due-date format on task cards (strftime-style).
    pub date_format: String,
    /// Timestamp format in the detail view (strftime-style).
    pub datetime_format: String,
    /// Description characters shown on a card before truncation.
    pub description_preview_len: usize,

    /// Filters applied on startup.
    pub initial_filters: FilterState,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: crate::api::http::DEFAULT_TIMEOUT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            poll_timeout: Duration::from_millis(50),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: "%b %-d, %Y %H:%M".to_string(),
            description_preview_len: DEFAULT_PREVIEW_LEN,
            initial_filters: FilterState::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. Otherwise the default path (`~/.config/taskdeck/config.toml`)
    /// is tried and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. Separated from `load()` so it can be
    /// tested without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| file.api.base_url.clone())
                .unwrap_or(defaults.base_url),
            timeout: cli
                .timeout_secs
                .or(file.api.timeout_secs)
                .map_or(defaults.timeout, Duration::from_secs),
            channel_capacity: file
                .api
                .channel_capacity
                .filter(|c| *c > 0)
                .unwrap_or(defaults.channel_capacity),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            date_format: file
                .ui
                .date_format
                .clone()
                .unwrap_or(defaults.date_format),
            datetime_format: file
                .ui
                .datetime_format
                .clone()
                .unwrap_or(defaults.datetime_format),
            description_preview_len: file
                .ui
                .description_preview_len
                .unwrap_or(defaults.description_preview_len),
            initial_filters: FilterState::new(
                Filter::from(cli.status),
                Filter::from(cli.priority),
            ),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal client for a remote task-tracking service")]
pub struct CliArgs {
    /// API root of the task service.
    #[arg(long, env = "TASKDECK_API_URL")]
    pub base_url: Option<String>,

    /// Path to config file (default: `~/.config/taskdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Show only tasks with this status (pending, `in_progress`, completed).
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Show only tasks with this priority (low, medium, high).
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskdeck.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and a missing
/// file is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("taskdeck").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
