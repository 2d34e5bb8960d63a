//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/habitrack/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/habitrack/` (~/.config/habitrack/)
//! - State/Logs: `$XDG_STATE_HOME/habitrack/` (~/.local/state/habitrack/)
//!
//! The `[hydration]` and `[sleep]` sections are the fallback settings used
//! when a snapshot carries none of its own.

use crate::error::{Error, Result};
use crate::types::{HydrationSettings, SleepSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};

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
    /// Default hydration goal and quick-add presets
    #[serde(default)]
    pub hydration: HydrationSettings,

    /// Default sleep target and schedule
    #[serde(default)]
    pub sleep: SleepSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
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

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde alone cannot express
    pub fn validate(&self) -> Result<()> {
        self.hydration.validate()?;
        self.sleep.validate()?;
        if self.logging.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Hydration settings to use when a snapshot has none.
    pub fn hydration_settings(&self) -> HydrationSettings {
        self.hydration.clone()
    }

    /// Sleep settings to use when a snapshot has none.
    pub fn sleep_settings(&self) -> SleepSettings {
        self.sleep.clone()
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/habitrack/config.toml` (~/.config/habitrack/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("habitrack").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/habitrack/` (~/.local/state/habitrack/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("habitrack")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/habitrack/habitrack.log` (~/.local/state/habitrack/habitrack.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("habitrack.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Preset;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hydration.daily_goal, 2500);
        assert_eq!(config.hydration.presets.len(), 3);
        assert_eq!(config.sleep.target_hours, 8.0);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[hydration]
daily_goal = 2000
presets = [330, { amount = 500, label = "Bottle" }]

[sleep]
target_hours = 7.5
target_bedtime = "22:30"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.hydration.daily_goal, 2000);
        assert_eq!(
            config.hydration.presets,
            vec![Preset::new(330), Preset::labeled(500, "Bottle")]
        );
        assert_eq!(config.sleep.target_hours, 7.5);
        assert_eq!(config.sleep.target_bedtime.to_string(), "22:30");
        // unset field keeps its default
        assert_eq!(config.sleep.target_wake_time.to_string(), "07:00");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_malformed_clock_rejected() {
        let toml = r#"
[sleep]
target_bedtime = "24:10"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = Config::default();
        config.hydration.daily_goal = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sleep.target_hours = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[hydration]\ndaily_goal = 3000").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.hydration_settings().daily_goal, 3000);
        assert_eq!(config.sleep_settings(), SleepSettings::default());
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sleep]\ntarget_hours = 7.2").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_paths() {
        assert!(Config::config_path().ends_with("habitrack/config.toml"));
        assert!(Config::log_path().ends_with("habitrack.log"));
    }
}
