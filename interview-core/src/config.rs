//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/interview/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/interview/` (~/.config/interview/)
//! - State/Logs: `$XDG_STATE_HOME/interview/` (~/.local/state/interview/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Greeting used to seed an empty transcript when the interview starts.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hi! I'm here to help you prepare for your real estate agent interview. Let's start by understanding your situation better. Are you currently working with a real estate agent, or are you looking to find one?";

/// Upper bound on quick replies offered for a single turn.
pub const MAX_SUGGESTIONS: usize = 4;

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

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Interview behaviour
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Watch mode configuration
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Interview session configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InterviewConfig {
    /// Assistant message appended when an empty interview is started
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Maximum number of quick replies exposed per turn (1-4)
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// File name used when exporting the checklist without an explicit path
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            max_suggestions: default_max_suggestions(),
            export_file_name: default_export_file_name(),
        }
    }
}

impl InterviewConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.welcome_message.trim().is_empty() {
            return Err(Error::Config(
                "interview.welcome_message must not be empty".to_string(),
            ));
        }
        if self.max_suggestions == 0 || self.max_suggestions > MAX_SUGGESTIONS {
            return Err(Error::Config(format!(
                "interview.max_suggestions must be between 1 and {}",
                MAX_SUGGESTIONS
            )));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(Error::Config(
                "interview.export_file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.to_string()
}

fn default_max_suggestions() -> usize {
    MAX_SUGGESTIONS
}

fn default_export_file_name() -> String {
    "real-estate-checklist.txt".to_string()
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

/// Watch mode configuration
#[derive(Debug, Deserialize)]
pub struct WatchConfig {
    /// Poll interval in milliseconds
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_ms: default_poll_ms(),
        }
    }
}

fn default_poll_ms() -> u64 {
    1000
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

        config.interview.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/interview/config.toml` (~/.config/interview/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("interview").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/interview/` (~/.local/state/interview/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("interview")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/interview/interview.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("interview.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.interview.max_suggestions, 4);
        assert_eq!(
            config.interview.export_file_name,
            "real-estate-checklist.txt"
        );
        assert_eq!(
            config.interview.welcome_message,
            "Hi! I'm here to help you prepare for your real estate agent interview. \
             Let's start by understanding your situation better. \
             Are you currently working with a real estate agent, or are you looking to find one?"
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.watch.poll_ms, 1000);
        assert!(config.interview.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[interview]
welcome_message = "Welcome back."
max_suggestions = 3

[logging]
level = "debug"

[watch]
poll_ms = 250
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.interview.welcome_message, "Welcome back.");
        assert_eq!(config.interview.max_suggestions, 3);
        assert_eq!(
            config.interview.export_file_name,
            "real-estate-checklist.txt"
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.max_files, 5);
        assert_eq!(config.watch.poll_ms, 250);
    }

    #[test]
    fn test_interview_config_validation() {
        let config = InterviewConfig {
            max_suggestions: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = InterviewConfig {
            max_suggestions: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = InterviewConfig {
            welcome_message: "   ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[interview]\nmax_suggestions = 9\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_suggestions"));
    }
}
