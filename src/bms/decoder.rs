//! # SmartBMS Frame Decoder
//!
//! Validates and decodes status frames, and pulls whole frames out of a
//! receive buffer.

use bytes::{Buf, BytesMut};

use super::checksum::{additive_checksum, is_valid_frame};
use super::protocol::*;
use crate::error::{BmsLoggerError, Result};

/// Decode a complete SmartBMS frame
///
/// # Arguments
///
/// * `frame` - Exactly `FRAME_LEN` bytes, checksum included
///
/// # Returns
///
/// * `Result<TelemetrySnapshot>` - Decoded readings; `serial_communication_error`
///   is always false here since the frame itself arrived intact
///
/// # Errors
///
/// Returns error if:
/// - Frame length is not `FRAME_LEN`
/// - Checksum does not match
pub fn decode_frame(frame: &[u8]) -> Result<TelemetrySnapshot> {
    if frame.len() != FRAME_LEN {
        return Err(BmsLoggerError::Protocol(format!(
            "Invalid frame length: expected {} bytes, got {}",
            FRAME_LEN,
            frame.len()
        )));
    }

    let calculated = additive_checksum(&frame[..CHECKSUM_OFFSET]);
    if calculated != frame[CHECKSUM_OFFSET] {
        return Err(BmsLoggerError::Protocol(format!(
            "Checksum mismatch: expected 0x{:02X}, got 0x{:02X}",
            calculated, frame[CHECKSUM_OFFSET]
        )));
    }

    let flags = frame[FLAGS_OFFSET];

    Ok(TelemetrySnapshot {
        pack_voltage: decode_pack_voltage(&frame[PACK_VOLTAGE_OFFSET..PACK_VOLTAGE_OFFSET + 3]),
        charge_current: decode_current(&frame[CHARGE_CURRENT_OFFSET..CHARGE_CURRENT_OFFSET + 3]),
        discharge_current: decode_current(
            &frame[DISCHARGE_CURRENT_OFFSET..DISCHARGE_CURRENT_OFFSET + 3],
        ),
        pack_current: decode_current(&frame[PACK_CURRENT_OFFSET..PACK_CURRENT_OFFSET + 3]),
        soc: frame[SOC_OFFSET],
        lowest_cell_voltage: decode_cell_voltage(
            &frame[LOWEST_CELL_VOLTAGE_OFFSET..LOWEST_CELL_VOLTAGE_OFFSET + 2],
        ),
        lowest_cell_voltage_num: frame[LOWEST_CELL_VOLTAGE_OFFSET + 2],
        highest_cell_voltage: decode_cell_voltage(
            &frame[HIGHEST_CELL_VOLTAGE_OFFSET..HIGHEST_CELL_VOLTAGE_OFFSET + 2],
        ),
        highest_cell_voltage_num: frame[HIGHEST_CELL_VOLTAGE_OFFSET + 2],
        lowest_cell_temperature: decode_temperature(
            &frame[LOWEST_CELL_TEMPERATURE_OFFSET..LOWEST_CELL_TEMPERATURE_OFFSET + 2],
        ),
        lowest_cell_temperature_num: frame[LOWEST_CELL_TEMPERATURE_OFFSET + 2],
        highest_cell_temperature: decode_temperature(
            &frame[HIGHEST_CELL_TEMPERATURE_OFFSET..HIGHEST_CELL_TEMPERATURE_OFFSET + 2],
        ),
        highest_cell_temperature_num: frame[HIGHEST_CELL_TEMPERATURE_OFFSET + 2],
        cell_count: frame[CELL_COUNT_OFFSET],
        allowed_to_charge: flags & FLAG_ALLOWED_TO_CHARGE != 0,
        allowed_to_discharge: flags & FLAG_ALLOWED_TO_DISCHARGE != 0,
        cell_communication_error: flags & FLAG_CELL_COMMUNICATION_ERROR != 0,
        serial_communication_error: false,
    })
}

/// Take the next checksum-valid frame off the front of `buf`
///
/// Bytes that cannot start a valid frame are discarded one at a time, so a
/// reader that joined mid-frame realigns on its own. Returns `None` once
/// fewer than `FRAME_LEN` bytes remain; those are kept for the next read.
pub fn next_frame(buf: &mut BytesMut) -> Option<BytesMut> {
    while buf.len() >= FRAME_LEN {
        if is_valid_frame(buf) {
            return Some(buf.split_to(FRAME_LEN));
        }
        buf.advance(1);
    }
    None
}

fn decode_pack_voltage(raw: &[u8]) -> f64 {
    let value = u32::from_be_bytes([0, raw[0], raw[1], raw[2]]);
    value as f64 * VOLTAGE_SCALE
}

fn decode_cell_voltage(raw: &[u8]) -> f64 {
    u16::from_be_bytes([raw[0], raw[1]]) as f64 * VOLTAGE_SCALE
}

fn decode_current(raw: &[u8]) -> f64 {
    let magnitude = u16::from_be_bytes([raw[1], raw[2]]) as f64 * CURRENT_SCALE;
    match raw[0] {
        CURRENT_NOT_AVAILABLE => 0.0,
        CURRENT_SIGN_NEGATIVE => -magnitude,
        _ => magnitude,
    }
}

fn decode_temperature(raw: &[u8]) -> f64 {
    u16::from_be_bytes([raw[0], raw[1]]) as f64 * TEMPERATURE_SCALE - TEMPERATURE_OFFSET
}
