//! # Telemetry Module
//!
//! Polls connected battery monitors and logs their readings to daily CSV
//! files.
//!
//! This module handles:
//! - Connecting every requested source before logging starts
//! - Sampling all sources once per tick, all-or-nothing
//! - Appending each batch to the file for the current local date
//! - Rotating files at midnight without losing or duplicating rows

pub mod source;
pub mod clock;
pub mod record;
pub mod registry;
pub mod sampler;
pub mod writer;
pub mod run;

pub use clock::{Clock, SystemClock};
pub use record::{LogRecord, COLUMNS};
pub use registry::{ConnectionHandle, SourceRegistry};
pub use run::{Logger, RunState, Shutdown, ShutdownTrigger};
pub use source::{Connector, TelemetrySource};
pub use writer::RotatingWriter;
