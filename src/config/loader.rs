//! Configuration file loading with precedence handling.

use crate::state::{
    TableOptions, DEFAULT_CONTAINER_EXTENT, DEFAULT_ESTIMATE_ROW_SIZE, DEFAULT_OVERSCAN,
    DEFAULT_PAGE_JUMP, DEFAULT_PAGE_SIZE,
};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "GRIDLINE_CONFIG";

/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "GRIDLINE_PAGE_SIZE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value the engine cannot use.
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        /// Setting or environment variable name.
        name: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/gridline/config.toml`.
///
/// ```toml
/// page_size = 50
/// pagination = true
/// estimate_row_size = 32
/// container_extent = 720
/// overscan = 8
/// page_jump = 20
/// log_file_path = "/tmp/gridline.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Rows per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Whether rows are split into pages at all.
    #[serde(default)]
    pub pagination: Option<bool>,

    /// Row size assumed before measurement.
    #[serde(default)]
    pub estimate_row_size: Option<usize>,

    /// Viewport extent along the scroll axis.
    #[serde(default)]
    pub container_extent: Option<usize>,

    /// Rows rendered beyond each viewport edge.
    #[serde(default)]
    pub overscan: Option<usize>,

    /// Rows moved by PageUp/PageDown.
    #[serde(default)]
    pub page_jump: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub page_size: usize,
    pub pagination: bool,
    pub estimate_row_size: usize,
    pub container_extent: usize,
    pub overscan: usize,
    pub page_jump: usize,
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            pagination: true,
            estimate_row_size: DEFAULT_ESTIMATE_ROW_SIZE,
            container_extent: DEFAULT_CONTAINER_EXTENT,
            overscan: DEFAULT_OVERSCAN,
            page_jump: DEFAULT_PAGE_JUMP,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Reject settings the engine cannot run with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for a zero page size while pagination
    /// is on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination && self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "page_size".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Table settings for these values; row identity is left to the caller.
    pub fn table_options<T>(&self) -> TableOptions<T> {
        TableOptions {
            row_key: None,
            page_size: self.pagination.then_some(self.page_size),
            estimate_row_size: self.estimate_row_size,
            container_extent: self.container_extent,
            overscan: self.overscan,
            page_jump: self.page_jump,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/gridline/gridline.log` on Linux, or the platform
/// equivalent. Falls back to the current directory when no state directory
/// is known.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("gridline").join("gridline.log"),
        None => PathBuf::from("gridline.log"),
    }
}

/// Resolve default config file path.
///
/// Returns `~/.config/gridline/config.toml` on Linux, the platform
/// equivalent elsewhere, or `None` when no config directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gridline").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (use defaults).
///
/// # Errors
///
/// Returns error if the file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        debug!(path = %path.display(), "No config file");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), "Loaded config file");
    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `GRIDLINE_CONFIG` environment variable
/// 3. Default path `~/.config/gridline/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        page_size: config.page_size.unwrap_or(defaults.page_size),
        pagination: config.pagination.unwrap_or(defaults.pagination),
        estimate_row_size: config
            .estimate_row_size
            .unwrap_or(defaults.estimate_row_size),
        container_extent: config
            .container_extent
            .unwrap_or(defaults.container_extent),
        overscan: config.overscan.unwrap_or(defaults.overscan),
        page_jump: config.page_jump.unwrap_or(defaults.page_jump),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `GRIDLINE_PAGE_SIZE`: Override page size
///
/// # Errors
///
/// [`ConfigError::InvalidValue`] when the variable is not a number.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(PAGE_SIZE_ENV) {
        config.page_size = raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                name: PAGE_SIZE_ENV.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?;
    }

    Ok(config)
}

/// Overrides taken from command-line flags.
///
/// Only flags the user actually set are `Some`/`true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub page_size: Option<usize>,
    pub no_pagination: bool,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: &CliOverrides) -> ResolvedConfig {
    if let Some(page_size) = overrides.page_size {
        config.page_size = page_size;
    }

    if overrides.no_pagination {
        config.pagination = false;
    }

    config
}

/// Run the whole precedence chain and validate the result.
pub fn resolve(
    config_path: Option<PathBuf>,
    overrides: &CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file))?;
    let config = apply_cli_overrides(config, overrides);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
