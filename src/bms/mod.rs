//! # SmartBMS Protocol Module
//!
//! Decoding of the fixed-size status frames streamed by a SmartBMS over its
//! serial interface.
//!
//! This module handles:
//! - Frame layout constants and the decoded `TelemetrySnapshot`
//! - Additive checksum validation
//! - Frame extraction from a byte stream with resynchronisation

pub mod protocol;
pub mod checksum;
pub mod decoder;

#[cfg(test)]
pub(crate) mod fixtures;
