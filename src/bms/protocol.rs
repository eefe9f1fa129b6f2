//! # SmartBMS Protocol Constants and Types
//!
//! Frame layout of the SmartBMS status stream. All multi-byte fields are
//! big-endian.
//!
//! | Bytes  | Field                                  | Scale            |
//! |--------|----------------------------------------|------------------|
//! | 0..3   | pack voltage (u24)                     | 0.005 V          |
//! | 3..6   | charge current (sign + u16)            | 0.125 A          |
//! | 6..9   | discharge current (sign + u16)         | 0.125 A          |
//! | 9..12  | pack current (sign + u16)              | 0.125 A          |
//! | 12..14 | lowest cell voltage (u16), index at 14 | 0.005 V          |
//! | 15..17 | highest cell voltage (u16), index 17   | 0.005 V          |
//! | 18..20 | lowest cell temperature, index at 20   | 0.857 × raw − 232 |
//! | 21..23 | highest cell temperature, index at 23  | 0.857 × raw − 232 |
//! | 25     | cell count                             |                  |
//! | 30     | status flags                           |                  |
//! | 40     | state of charge                        | %                |
//! | 57     | checksum                               |                  |

/// Total frame length including the trailing checksum byte
pub const FRAME_LEN: usize = 58;

/// Offset of the checksum byte
pub const CHECKSUM_OFFSET: usize = FRAME_LEN - 1;

pub const PACK_VOLTAGE_OFFSET: usize = 0;
pub const CHARGE_CURRENT_OFFSET: usize = 3;
pub const DISCHARGE_CURRENT_OFFSET: usize = 6;
pub const PACK_CURRENT_OFFSET: usize = 9;
pub const LOWEST_CELL_VOLTAGE_OFFSET: usize = 12;
pub const HIGHEST_CELL_VOLTAGE_OFFSET: usize = 15;
pub const LOWEST_CELL_TEMPERATURE_OFFSET: usize = 18;
pub const HIGHEST_CELL_TEMPERATURE_OFFSET: usize = 21;
pub const CELL_COUNT_OFFSET: usize = 25;
pub const FLAGS_OFFSET: usize = 30;
pub const SOC_OFFSET: usize = 40;

/// Volts per LSB for pack and cell voltages
pub const VOLTAGE_SCALE: f64 = 0.005;

/// Amperes per LSB for currents
pub const CURRENT_SCALE: f64 = 0.125;

/// Degrees Celsius per LSB for temperatures
pub const TEMPERATURE_SCALE: f64 = 0.857;

/// Offset subtracted after scaling a raw temperature
pub const TEMPERATURE_OFFSET: f64 = 232.0;

/// Sign byte marking a negative current
pub const CURRENT_SIGN_NEGATIVE: u8 = b'-';

/// Sign byte marking a current the BMS cannot measure
pub const CURRENT_NOT_AVAILABLE: u8 = b'X';

pub const FLAG_ALLOWED_TO_CHARGE: u8 = 0b0000_0001;
pub const FLAG_ALLOWED_TO_DISCHARGE: u8 = 0b0000_0010;
pub const FLAG_CELL_COMMUNICATION_ERROR: u8 = 0b0000_0100;

/// Current readings of one battery pack
///
/// Values are passed through exactly as decoded, without unit conversion.
/// `serial_communication_error` is not part of the frame; it is set by the
/// source when its link has gone quiet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetrySnapshot {
    /// Pack voltage in volts
    pub pack_voltage: f64,

    /// Charge current in amperes
    pub charge_current: f64,

    /// Discharge current in amperes
    pub discharge_current: f64,

    /// Net pack current in amperes (negative when discharging)
    pub pack_current: f64,

    /// State of charge (0-100%)
    pub soc: u8,

    pub lowest_cell_voltage: f64,
    pub lowest_cell_voltage_num: u8,
    pub highest_cell_voltage: f64,
    pub highest_cell_voltage_num: u8,

    pub lowest_cell_temperature: f64,
    pub lowest_cell_temperature_num: u8,
    pub highest_cell_temperature: f64,
    pub highest_cell_temperature_num: u8,

    /// Number of cells reported by the BMS
    pub cell_count: u8,

    pub allowed_to_charge: bool,
    pub allowed_to_discharge: bool,
    pub cell_communication_error: bool,
    pub serial_communication_error: bool,
}
