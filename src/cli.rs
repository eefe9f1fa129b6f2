//! # Command Line Interface
//!
//! Argument parsing shared by the logger and the viewer binaries.

use clap::{Args, Parser};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Options common to every binary that connects to BMS units
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Serial port(s). For multiple BMS, separate the ports with a space.
    /// Defaults to /dev/ttyUSB0 if neither this nor a config file sets any.
    #[arg(short, long = "port", value_name = "PORT", num_args = 1..)]
    pub ports: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait after connecting before reading values
    #[arg(long, value_name = "SECS")]
    pub settle: Option<u64>,
}

impl SourceArgs {
    /// Configuration file (or defaults) with these options applied on top
    ///
    /// Not validated; callers validate after applying their own overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let ports = split_ports(&self.ports);
        if !ports.is_empty() {
            config.serial.ports = ports;
        }

        if let Some(settle) = self.settle {
            config.logging.settle_delay_s = settle;
        }

        Ok(config)
    }
}

/// SmartBMS CSV Logger
#[derive(Debug, Parser)]
#[command(name = "bms-logger", version, about = "SmartBMS CSV Logger")]
pub struct LoggerCli {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Directory receiving the daily CSV files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Seconds between samples
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

impl LoggerCli {
    /// Resolve and validate the effective configuration
    pub fn config(&self) -> Result<Config> {
        let mut config = self.sources.load_config()?;

        if let Some(dir) = &self.log_dir {
            config.logging.log_dir = dir.clone();
        }
        if let Some(interval) = self.interval {
            config.logging.poll_interval_s = interval;
        }

        config.validate()?;
        Ok(config)
    }
}

/// SmartBMS Data Viewer
#[derive(Debug, Parser)]
#[command(name = "bms-viewer", version, about = "SmartBMS Data Viewer")]
pub struct ViewerCli {
    #[command(flatten)]
    pub sources: SourceArgs,
}

impl ViewerCli {
    pub fn config(&self) -> Result<Config> {
        let config = self.sources.load_config()?;
        config.validate()?;
        Ok(config)
    }
}

/// Split port arguments on whitespace, so `-p "/dev/ttyUSB0 /dev/ttyUSB1"`
/// names two ports
pub fn split_ports(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split_whitespace())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BmsLoggerError;

    #[test]
    fn test_defaults() {
        let cli = LoggerCli::try_parse_from(["bms-logger"]).unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.serial.ports, vec!["/dev/ttyUSB0"]);
        assert_eq!(config.logging.poll_interval_s, 60);
        assert_eq!(config.logging.settle_delay_s, 10);
    }

    #[test]
    fn test_multiple_ports() {
        let cli = LoggerCli::try_parse_from(["bms-logger", "-p", "/dev/ttyUSB0", "/dev/ttyUSB1"]).unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.serial.ports, vec!["/dev/ttyUSB0", "/dev/ttyUSB1"]);
    }

    #[test]
    fn test_space_separated_ports() {
        let cli = LoggerCli::try_parse_from(["bms-logger", "--port", "/dev/ttyUSB0 /dev/ttyUSB1"]).unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.serial.ports, vec!["/dev/ttyUSB0", "/dev/ttyUSB1"]);
    }

    #[test]
    fn test_overrides() {
        let cli = LoggerCli::try_parse_from([
            "bms-logger",
            "--log-dir",
            "/tmp/bms",
            "--interval",
            "30",
            "--settle",
            "0",
        ])
        .unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.logging.log_dir, "/tmp/bms");
        assert_eq!(config.logging.poll_interval_s, 30);
        assert_eq!(config.logging.settle_delay_s, 0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = LoggerCli::try_parse_from(["bms-logger", "--interval", "0"]).unwrap();
        assert!(matches!(cli.config(), Err(BmsLoggerError::Config(_))));
    }

    #[test]
    fn test_config_file_with_cli_ports() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[serial]\nports = [\"/dev/ttyS0\"]\n\n[logging]\npoll_interval_s = 15\n")
            .unwrap();
        temp_file.flush().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let cli = LoggerCli::try_parse_from(["bms-logger", "-c", path]).unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.serial.ports, vec!["/dev/ttyS0"]);
        assert_eq!(config.logging.poll_interval_s, 15);

        let cli = LoggerCli::try_parse_from(["bms-logger", "-c", path, "-p", "/dev/ttyUSB3"]).unwrap();
        assert_eq!(cli.config().unwrap().serial.ports, vec!["/dev/ttyUSB3"]);
    }

    #[test]
    fn test_viewer_rejects_logger_flags() {
        assert!(ViewerCli::try_parse_from(["bms-viewer", "--interval", "5"]).is_err());
        let cli = ViewerCli::try_parse_from(["bms-viewer", "-p", "/dev/ttyUSB1"]).unwrap();
        assert_eq!(cli.config().unwrap().serial.ports, vec!["/dev/ttyUSB1"]);
    }

    #[test]
    fn test_split_ports_ignores_extra_whitespace() {
        let values = vec!["  /dev/ttyUSB0   /dev/ttyUSB1 ".to_string(), "/dev/ttyUSB2".to_string()];
        assert_eq!(split_ports(&values), vec!["/dev/ttyUSB0", "/dev/ttyUSB1", "/dev/ttyUSB2"]);
    }
}
