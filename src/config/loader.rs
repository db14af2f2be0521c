//! Configuration file loading with precedence handling.

use crate::state::{ChatSettings, ListStrategy};
use crate::view_state::{HeightParams, HeightRefresh};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "VCHAT_CONFIG";
/// Environment variable overriding the list strategy.
pub const ENV_STRATEGY: &str = "VCHAT_STRATEGY";
/// Environment variable overriding the tick period in milliseconds.
pub const ENV_TICK_MS: &str = "VCHAT_TICK_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown fields.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An override environment variable holds a value that does not parse.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidEnvValue {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/vchat/config.toml`.
///
/// ```toml
/// strategy = "virtualized"
/// tick_ms = 15
/// height_refresh = "streaming-row"
///
/// [heights]
/// base = 2
/// max = 2000
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// List rendering strategy ("virtualized" or "simple").
    #[serde(default)]
    pub strategy: Option<ListStrategy>,

    /// Milliseconds between generated chunks.
    #[serde(default)]
    pub tick_ms: Option<u64>,

    /// Words per generated response.
    #[serde(default)]
    pub target_words: Option<usize>,

    /// Fixed PRNG seed for reproducible responses.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Rows rendered beyond each viewport edge.
    #[serde(default)]
    pub overscan: Option<usize>,

    /// Distance from the bottom, in rows, that still counts as "at the bottom".
    #[serde(default)]
    pub near_bottom_threshold: Option<u64>,

    /// Height cache refresh policy ("structural" or "streaming-row").
    #[serde(default)]
    pub height_refresh: Option<HeightRefresh>,

    /// Render message content as markdown.
    #[serde(default)]
    pub markdown: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Height heuristic constants.
    #[serde(default)]
    pub heights: Option<HeightsSection>,
}

/// `[heights]` table of the config file, in terminal rows.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HeightsSection {
    /// Rows every message takes regardless of content.
    #[serde(default)]
    pub base: Option<u32>,
    /// Rows per content line.
    #[serde(default)]
    pub per_line: Option<u32>,
    /// Rows per fenced code block.
    #[serde(default)]
    pub per_code_block: Option<u32>,
    /// Lower clamp.
    #[serde(default)]
    pub min: Option<u32>,
    /// Upper clamp.
    #[serde(default)]
    pub max: Option<u32>,
}

impl HeightsSection {
    fn merge_into(self, defaults: HeightParams) -> HeightParams {
        HeightParams {
            base: self.base.unwrap_or(defaults.base),
            per_line: self.per_line.unwrap_or(defaults.per_line),
            per_code_block: self.per_code_block.unwrap_or(defaults.per_code_block),
            min: self.min.unwrap_or(defaults.min),
            max: self.max.unwrap_or(defaults.max),
        }
        .normalized()
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// List strategy at startup.
    pub strategy: ListStrategy,
    /// Milliseconds between chunks.
    pub tick_ms: u64,
    /// Words per response.
    pub target_words: usize,
    /// Fixed seed, or `None` for a random one.
    pub seed: Option<u64>,
    /// Overscan rows.
    pub overscan: usize,
    /// Near-bottom threshold in rows.
    pub near_bottom_threshold: u64,
    /// Height cache refresh policy.
    pub height_refresh: HeightRefresh,
    /// Markdown rendering.
    pub markdown: bool,
    /// Height heuristic constants.
    pub heights: HeightParams,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let chat = ChatSettings::default();
        Self {
            strategy: chat.strategy,
            tick_ms: u64::try_from(chat.tick.as_millis()).unwrap_or(15),
            target_words: chat.target_words,
            seed: chat.seed,
            overscan: chat.overscan,
            near_bottom_threshold: chat.near_bottom_threshold,
            height_refresh: chat.height_refresh,
            markdown: chat.markdown,
            heights: chat.heights,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Session settings derived from this configuration.
    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            tick: Duration::from_millis(self.tick_ms),
            target_words: self.target_words,
            seed: self.seed,
            overscan: self.overscan,
            near_bottom_threshold: self.near_bottom_threshold,
            heights: self.heights,
            height_refresh: self.height_refresh,
            strategy: self.strategy,
            markdown: self.markdown,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/vchat/vchat.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("vchat").join("vchat.log")
    } else {
        PathBuf::from("vchat.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
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

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/vchat/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vchat").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `VCHAT_CONFIG` environment variable
/// 3. Default path `~/.config/vchat/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        strategy: config.strategy.unwrap_or(defaults.strategy),
        tick_ms: config.tick_ms.unwrap_or(defaults.tick_ms),
        target_words: config.target_words.unwrap_or(defaults.target_words),
        seed: config.seed.or(defaults.seed),
        overscan: config.overscan.unwrap_or(defaults.overscan),
        near_bottom_threshold: config
            .near_bottom_threshold
            .unwrap_or(defaults.near_bottom_threshold),
        height_refresh: config.height_refresh.unwrap_or(defaults.height_refresh),
        markdown: config.markdown.unwrap_or(defaults.markdown),
        heights: config
            .heights
            .map_or(defaults.heights, |h| h.merge_into(defaults.heights)),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `VCHAT_STRATEGY`: Override list strategy
/// - `VCHAT_TICK_MS`: Override tick period
///
/// # Errors
///
/// Returns error if a variable is set to a value that does not parse.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(value) = std::env::var(ENV_STRATEGY) {
        config.strategy = value
            .parse()
            .map_err(|reason| ConfigError::InvalidEnvValue {
                var: ENV_STRATEGY,
                value: value.clone(),
                reason,
            })?;
    }

    if let Ok(value) = std::env::var(ENV_TICK_MS) {
        config.tick_ms = value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnvValue {
                var: ENV_TICK_MS,
                value: value.clone(),
                reason: e.to_string(),
            })?;
    }

    Ok(config)
}

/// Values given on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--strategy`
    pub strategy: Option<ListStrategy>,
    /// `--tick-ms`
    pub tick_ms: Option<u64>,
    /// `--words`
    pub target_words: Option<usize>,
    /// `--seed`
    pub seed: Option<u64>,
    /// `--plain`: disable markdown rendering
    pub plain: bool,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }

    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms;
    }

    if let Some(words) = cli.target_words {
        config.target_words = words;
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if cli.plain {
        config.markdown = false;
    }

    config
}

/// Run the whole precedence chain.
///
/// # Errors
///
/// Returns error if the config file is unreadable or invalid, or an
/// override variable does not parse.
pub fn resolve(config_path: Option<PathBuf>, cli: CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file))?;
    Ok(apply_cli_overrides(config, cli))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
