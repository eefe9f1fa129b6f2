//! # Telemetry Source Capability
//!
//! Abstractions over a connected BMS so the core never depends on how
//! readings are refreshed.

use async_trait::async_trait;

use crate::bms::protocol::TelemetrySnapshot;
use crate::error::Result;

/// A connected source of live pack readings
///
/// Implementations keep their readings current in the background. Taking a
/// snapshot only reads already-held state and must never block on I/O.
#[cfg_attr(test, mockall::automock)]
pub trait TelemetrySource: Send + Sync {
    /// Most recent known readings
    fn snapshot(&self) -> Result<TelemetrySnapshot>;
}

/// Performs the connect handshake for one connection identifier
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to `port`, returning a source whose readings are refreshed
    /// in the background from now on
    ///
    /// # Errors
    ///
    /// Returns `BmsLoggerError::Connection` if the device cannot be reached
    async fn connect(&self, port: &str) -> Result<Box<dyn TelemetrySource>>;
}
