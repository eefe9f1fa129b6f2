//! # BMS Logger Library
//!
//! Poll SmartBMS battery monitors over serial and keep a durable CSV
//! history of their readings.
//!
//! Each run connects to one or more BMS units, samples all of them on a
//! fixed cadence, and appends the rows to one CSV file per local calendar
//! date.

pub mod config;
pub mod error;
pub mod bms;
pub mod serial;
pub mod telemetry;
pub mod cli;
pub mod diagnostics;
pub mod viewer;
