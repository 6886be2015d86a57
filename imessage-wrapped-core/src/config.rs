//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/imessage-wrapped/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/imessage-wrapped/` (~/.config/imessage-wrapped/)
//! - State/Logs: `$XDG_STATE_HOME/imessage-wrapped/` (~/.local/state/imessage-wrapped/)
//!
//! The message database itself is owned by Messages.app and lives at
//! `~/Library/Messages/chat.db` unless overridden.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "imessage-wrapped";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Expand a leading `~/` against the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Message database location
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Report rendering options
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where to find the Messages database
#[derive(Debug, Deserialize, Default)]
pub struct MessagesConfig {
    /// Override path for chat.db (a leading `~/` is expanded)
    pub database_path: Option<PathBuf>,
}

/// Report rendering options
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Rows shown under "Top Reactions (All)"
    #[serde(default = "default_top_reactions")]
    pub top_reactions: usize,

    /// Rows shown under "Your Custom Reactions"
    #[serde(default = "default_top_custom_emoji")]
    pub top_custom_emoji: usize,

    /// Width in cells of the busiest month's bar
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_reactions: default_top_reactions(),
            top_custom_emoji: default_top_custom_emoji(),
            bar_width: default_bar_width(),
        }
    }
}

impl ReportConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.bar_width == 0 {
            return Err(Error::Config(
                "report.bar_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_top_reactions() -> usize {
    10
}

fn default_top_custom_emoji() -> usize {
    10
}

fn default_bar_width() -> usize {
    20
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.report.validate()?;
        Ok(config)
    }

    /// Returns the message database path: the configured override, or
    /// `~/Library/Messages/chat.db`.
    pub fn database_path(&self) -> PathBuf {
        match &self.messages.database_path {
            Some(path) => expand_home(path),
            None => Self::default_database_path(),
        }
    }

    /// Returns the default location of the Messages database
    pub fn default_database_path() -> PathBuf {
        home_dir().join("Library/Messages/chat.db")
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/imessage-wrapped/config.toml` (~/.config/imessage-wrapped/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/imessage-wrapped/` (~/.local/state/imessage-wrapped/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }
}
