//! Configuration management for rollstat.
//!
//! This module provides configuration handling with:
//! - YAML file support
//! - Programmatic construction through [`ConfigBuilder`]
//! - Validation and defaults

use crate::core::{Result, RollstatError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete configuration for a rolling metrics instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rolling window configuration
    pub rolling: RollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Rolling window shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Total span covered by the window
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// Number of buckets the window is divided into
    pub buckets: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
    /// Include thread ids and line numbers in log lines
    pub structured: bool,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for RollingConfig {
    fn default() -> Self {
        RollingConfig {
            window: Duration::from_secs(10),
            buckets: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            structured: false,
        }
    }
}

impl RollingConfig {
    /// Create a rolling configuration and validate it
    pub fn new(window: Duration, buckets: usize) -> Result<Self> {
        let config = RollingConfig { window, buckets };
        config.validate()?;
        Ok(config)
    }

    /// Window length in milliseconds
    pub fn window_millis(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }

    /// Length of one bucket in milliseconds
    pub fn bucket_size_millis(&self) -> i64 {
        // validate() guarantees buckets > 0 and an even split
        self.window_millis() / self.buckets.max(1) as i64
    }

    /// Validate the window shape
    pub fn validate(&self) -> Result<()> {
        if self.buckets == 0 {
            return Err(RollstatError::config("buckets must be greater than 0"));
        }

        let window_ms = self.window_millis();
        if window_ms <= 0 {
            return Err(RollstatError::config("window must be at least 1ms"));
        }

        let buckets = i64::try_from(self.buckets)
            .map_err(|_| RollstatError::config(format!("too many buckets: {}", self.buckets)))?;
        if window_ms % buckets != 0 {
            return Err(RollstatError::config(format!(
                "window of {}ms must divide equally into {} buckets",
                window_ms, self.buckets
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Result<Self> {
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.rolling.validate()
    }
}

impl LogLevel {
    /// Convert to tracing filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| RollstatError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Set the total window duration
    pub fn window(mut self, window: Duration) -> Self {
        self.config.rolling.window = window;
        self
    }

    /// Set the number of buckets
    pub fn buckets(mut self, buckets: usize) -> Self {
        self.config.rolling.buckets = buckets;
        self
    }

    /// Set the log level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
