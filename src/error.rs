//! # Error Types
//!
//! Custom error types for BMS Logger using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for BMS Logger
#[derive(Debug, Error)]
pub enum BmsLoggerError {
    /// A telemetry source could not be brought up
    #[error("Connection error on {port}: {reason}")]
    Connection { port: String, reason: String },

    /// Reading a snapshot from a connected source failed
    #[error("Sample error on {port}: {reason}")]
    Sample { port: String, reason: String },

    /// Opening, writing or flushing the current log file failed
    #[error("Write error on {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file for a new date could not be created
    #[error("Rotation error opening {}: {source}", path.display())]
    Rotation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No connection identifiers were supplied
    #[error("No telemetry sources configured")]
    NoSources,

    /// SmartBMS frame errors
    #[error("BMS protocol error: {0}")]
    Protocol(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BmsLoggerError {
    /// Short name of the failure category, for operator-facing messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "ConnectionError",
            Self::Sample { .. } => "SampleError",
            Self::Write { .. } => "WriteError",
            Self::Rotation { .. } => "RotationError",
            Self::NoSources => "ConfigError",
            Self::Protocol(_) => "ProtocolError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
        }
    }
}

/// Result type alias for BMS Logger
pub type Result<T> = std::result::Result<T, BmsLoggerError>;
