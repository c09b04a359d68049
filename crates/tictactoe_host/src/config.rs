//! Host configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tictactoe_match::MatchSettings;
use tracing::{debug, info, instrument};

/// Settings for the in-process match host.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct HostConfig {
    /// Session ticks per second.
    #[serde(default = "default_tick_rate")]
    tick_rate: u32,

    /// Ticks between a human move and the bot's reply.
    #[serde(default = "default_bot_delay_ticks")]
    bot_delay_ticks: u64,

    /// Seed for the process-wide random source. Drawn from OS entropy when absent.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_tick_rate() -> u32 {
    10
}

#[instrument]
fn default_bot_delay_ticks() -> u64 {
    5
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            bot_delay_ticks: default_bot_delay_ticks(),
            seed: None,
        }
    }
}

impl HostConfig {
    /// Creates a configuration.
    #[instrument]
    pub fn new(tick_rate: u32, bot_delay_ticks: u64, seed: Option<u64>) -> Result<Self, ConfigError> {
        Self {
            tick_rate,
            bot_delay_ticks,
            seed,
        }
        .validated()
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(tick_rate = config.tick_rate, bot_delay_ticks = config.bot_delay_ticks, "Config loaded");
        config.validated()
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Wall-clock length of one tick.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }

    /// Per-session pacing derived from this configuration.
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            bot_delay_ticks: self.bot_delay_ticks,
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::new("tick_rate must be at least 1".to_string()));
        }
        Ok(self)
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

    #[test]
    fn test_defaults_pace_bot_at_half_a_second() {
        let config = HostConfig::default();
        assert_eq!(config.tick_period() * (*config.bot_delay_ticks() as u32), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        assert!(HostConfig::new(0, 1, None).is_err());
    }
}
