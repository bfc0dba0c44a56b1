//! Application configuration loaded from TOML.

use crate::cli::Cli;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Runtime settings for the terminal app.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where settings and scores are saved.
    #[serde(default = "default_state_file")]
    state_file: PathBuf,

    /// Where logs are written.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Pause before the computer plays, in milliseconds.
    #[serde(default = "default_computer_delay_ms")]
    computer_delay_ms: u64,

    /// How long the round-win sparkles last, in milliseconds.
    #[serde(default = "default_celebration_ms")]
    celebration_ms: u64,
}

#[instrument]
fn default_state_file() -> PathBuf {
    PathBuf::from("ultimate_ttt_state.json")
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("ultimate_ttt.log")
}

#[instrument]
fn default_computer_delay_ms() -> u64 {
    220
}

#[instrument]
fn default_celebration_ms() -> u64 {
    1200
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_file: default_log_file(),
            computer_delay_ms: default_computer_delay_ms(),
            celebration_ms: default_celebration_ms(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid config TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(state_file = %config.state_file.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is malformed.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Resolves the effective configuration: the config file, then CLI flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file is malformed.
    #[instrument(skip(cli))]
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self::load_or_default(&cli.config)?.with_overrides(cli))
    }

    /// Applies CLI flags on top of file values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(state_file) = &cli.state_file {
            self.state_file = state_file.clone();
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = log_file.clone();
        }
        self
    }

    /// Returns a copy saving to `state_file`.
    pub fn with_state_file(mut self, state_file: impl Into<PathBuf>) -> Self {
        self.state_file = state_file.into();
        self
    }

    /// Returns a copy with the given computer delay.
    pub fn with_computer_delay_ms(mut self, computer_delay_ms: u64) -> Self {
        self.computer_delay_ms = computer_delay_ms;
        self
    }

    /// Returns a copy with the given celebration length.
    pub fn with_celebration_ms(mut self, celebration_ms: u64) -> Self {
        self.celebration_ms = celebration_ms;
        self
    }

    /// Computer pacing delay.
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    /// Celebration length.
    pub fn celebration(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_missing_fields_default() {
        let config = AppConfig::from_toml("computer_delay_ms = 50").expect("valid config");
        assert_eq!(*config.computer_delay_ms(), 50);
        assert_eq!(*config.celebration_ms(), 1200);
        assert_eq!(config.state_file(), &default_state_file());
    }

    #[test]
    fn test_malformed_is_error() {
        let err = AppConfig::from_toml("computer_delay_ms = \"soon\"").expect_err("bad type");
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from(["ultimate_ttt", "--state-file", "elsewhere.json"]);
        let config = AppConfig::from_toml("state_file = \"from_file.json\"")
            .expect("valid config")
            .with_overrides(&cli);
        assert_eq!(config.state_file(), &PathBuf::from("elsewhere.json"));
        assert_eq!(config.log_file(), &default_log_file());
    }
}
