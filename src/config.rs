//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{BmsLoggerError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_ports")]
    pub ports: Vec<String>,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_stale_after_ms")]
    pub stale_after_ms: u64,
}

/// CSV log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    #[serde(default = "default_poll_interval_s")]
    pub poll_interval_s: u64,

    #[serde(default = "default_settle_delay_s")]
    pub settle_delay_s: u64,
}

/// Diagnostic (tracing) output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub log_dir: Option<String>,

    #[serde(default = "default_level")]
    pub level: String,
}

// Default value functions
fn default_ports() -> Vec<String> { vec!["/dev/ttyUSB0".to_string()] }
fn default_baud_rate() -> u32 { 9600 }
fn default_stale_after_ms() -> u64 { 5000 }

fn default_log_dir() -> String { "bms-logs".to_string() }
fn default_file_prefix() -> String { "bms".to_string() }
fn default_poll_interval_s() -> u64 { 60 }
fn default_settle_delay_s() -> u64 { 10 }

fn default_level() -> String { "info".to_string() }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            ports: default_ports(),
            baud_rate: default_baud_rate(),
            stale_after_ms: default_stale_after_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_prefix: default_file_prefix(),
            poll_interval_s: default_poll_interval_s(),
            settle_delay_s: default_settle_delay_s(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    /// Time between two sampling ticks
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_s)
    }

    /// Pause between connecting and the first sample
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_s)
    }
}

impl SerialConfig {
    /// Age after which a source without fresh frames reports a serial error
    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}

fn invalid(msg: impl std::fmt::Display) -> BmsLoggerError {
    BmsLoggerError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bms_logger::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.serial.ports.is_empty() {
            return Err(invalid("at least one serial port is required"));
        }

        if self.serial.ports.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("serial port cannot be empty"));
        }

        if ![9600, 19200, 38400, 57600, 115200].contains(&self.serial.baud_rate) {
            return Err(invalid(
                "baud_rate must be one of: 9600, 19200, 38400, 57600, 115200",
            ));
        }

        if self.serial.stale_after_ms < 100 || self.serial.stale_after_ms > 60000 {
            return Err(invalid("stale_after_ms must be between 100 and 60000"));
        }

        if self.logging.log_dir.is_empty() {
            return Err(invalid("logging log_dir cannot be empty"));
        }

        // The prefix becomes part of a file name inside log_dir
        if self.logging.file_prefix.is_empty()
            || self.logging.file_prefix.contains(['/', '\\'])
        {
            return Err(invalid(
                "file_prefix must be non-empty and contain no path separators",
            ));
        }

        if self.logging.poll_interval_s == 0 || self.logging.poll_interval_s > 86400 {
            return Err(invalid("poll_interval_s must be between 1 and 86400"));
        }

        if self.logging.settle_delay_s > 600 {
            return Err(invalid("settle_delay_s must be between 0 and 600"));
        }

        if !["trace", "debug", "info", "warn", "error"]
            .contains(&self.diagnostics.level.as_str())
        {
            return Err(invalid(format!(
                "unknown diagnostics level '{}'",
                self.diagnostics.level
            )));
        }

        if matches!(&self.diagnostics.log_dir, Some(dir) if dir.is_empty()) {
            return Err(invalid("diagnostics log_dir cannot be empty when set"));
        }

        Ok(())
    }
}
