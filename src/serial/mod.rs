//! # Serial Communication Module
//!
//! Handles serial communication with SmartBMS units.
//!
//! This module handles:
//! - Opening each serial port 8N1 at the configured baud rate
//! - Reading status frames in a background task
//! - Exposing the latest readings without blocking on I/O
//! - Flagging a serial communication error when frames stop arriving

pub mod reader;

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info};

use crate::bms::protocol::TelemetrySnapshot;
use crate::config::SerialConfig;
use crate::error::{BmsLoggerError, Result};
use crate::telemetry::source::{Connector, TelemetrySource};
use reader::{read_frames, Readings, SharedReadings};

/// SmartBMS serial baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// SmartBMS Serial Port Handler
///
/// Owns the background reader for one port. Dropping it stops the reader.
pub struct BmsSerial {
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
    readings: SharedReadings,
    stale_after: Duration,
    reader: JoinHandle<()>,
}

impl std::fmt::Debug for BmsSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BmsSerial")
            .field("device_path", &self.device_path)
            .field("stale_after", &self.stale_after)
            .finish_non_exhaustive()
    }
}

impl BmsSerial {
    /// Open a SmartBMS serial port and start reading frames
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `BmsLoggerError::Connection` if the port cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bms_logger::serial::{BmsSerial, DEFAULT_BAUD_RATE};
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let bms = BmsSerial::open("/dev/ttyUSB0", DEFAULT_BAUD_RATE, Duration::from_secs(5))?;
    ///     println!("Reading from {}", bms.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str, baud_rate: u32, stale_after: Duration) -> Result<Self> {
        let port = Self::open_port(path, baud_rate)?;
        info!("Opened SmartBMS port {} at {} baud", path, baud_rate);
        Ok(Self::spawn(path, port, stale_after))
    }

    /// Start reading frames from an already open byte stream
    pub fn spawn<R>(path: &str, stream: R, stale_after: Duration) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let readings: SharedReadings = Arc::new(RwLock::new(Readings::default()));
        let reader = tokio::spawn(read_frames(stream, readings.clone(), path.to_string()));

        Self {
            device_path: path.to_string(),
            readings,
            stale_after,
            reader,
        }
    }

    /// Open a specific serial port with SmartBMS settings
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| BmsLoggerError::Connection {
                port: path.to_string(),
                reason: format!("Failed to open {}: {}", path, e),
            })
    }

    /// Path of the serial device this source reads from
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

impl TelemetrySource for BmsSerial {
    fn snapshot(&self) -> Result<TelemetrySnapshot> {
        let readings = self.readings.read().map_err(|_| BmsLoggerError::Sample {
            port: self.device_path.clone(),
            reason: "readings lock poisoned".to_string(),
        })?;
        Ok(readings.snapshot_at(Instant::now(), self.stale_after))
    }
}

impl Drop for BmsSerial {
    fn drop(&mut self) {
        debug!("Stopping reader for {}", self.device_path);
        self.reader.abort();
    }
}

/// Connects SmartBMS units over serial ports
#[derive(Debug, Clone)]
pub struct SerialConnector {
    baud_rate: u32,
    stale_after: Duration,
}

impl SerialConnector {
    pub fn new(baud_rate: u32, stale_after: Duration) -> Self {
        Self {
            baud_rate,
            stale_after,
        }
    }

    pub fn from_config(config: &SerialConfig) -> Self {
        Self::new(config.baud_rate, config.stale_after())
    }
}

#[async_trait]
impl Connector for SerialConnector {
    async fn connect(&self, port: &str) -> Result<Box<dyn TelemetrySource>> {
        let bms = BmsSerial::open(port, self.baud_rate, self.stale_after)?;
        Ok(Box::new(bms))
    }
}
