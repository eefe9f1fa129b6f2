//! # Log Records
//!
//! One CSV row per (tick, source), and the fixed column schema every row
//! follows.

use chrono::NaiveDateTime;

use crate::bms::protocol::TelemetrySnapshot;

/// Header row of every log file, in column order
pub const COLUMNS: [&str; 20] = [
    "Timestamp",
    "Port",
    "pack_voltage",
    "charge_current",
    "discharge_current",
    "pack_current",
    "soc",
    "lowest_cell_voltage",
    "lowest_cell_voltage_num",
    "highest_cell_voltage",
    "highest_cell_voltage_num",
    "lowest_cell_temperature",
    "lowest_cell_temperature_num",
    "highest_cell_temperature",
    "highest_cell_temperature_num",
    "cell_count",
    "allowed_to_charge",
    "allowed_to_discharge",
    "cell_communication_error",
    "serial_communication_error",
];

/// ISO-8601 local timestamp with microseconds, no offset
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A sampled snapshot stamped with when and where it was taken
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub port: String,
    pub snapshot: TelemetrySnapshot,
}

impl LogRecord {
    pub fn new(timestamp: NaiveDateTime, port: impl Into<String>, snapshot: TelemetrySnapshot) -> Self {
        Self {
            timestamp,
            port: port.into(),
            snapshot,
        }
    }

    /// Render the row in `COLUMNS` order
    pub fn fields(&self) -> [String; 20] {
        let s = &self.snapshot;
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.port.clone(),
            s.pack_voltage.to_string(),
            s.charge_current.to_string(),
            s.discharge_current.to_string(),
            s.pack_current.to_string(),
            s.soc.to_string(),
            s.lowest_cell_voltage.to_string(),
            s.lowest_cell_voltage_num.to_string(),
            s.highest_cell_voltage.to_string(),
            s.highest_cell_voltage_num.to_string(),
            s.lowest_cell_temperature.to_string(),
            s.lowest_cell_temperature_num.to_string(),
            s.highest_cell_temperature.to_string(),
            s.highest_cell_temperature_num.to_string(),
            s.cell_count.to_string(),
            format_flag(s.allowed_to_charge),
            format_flag(s.allowed_to_discharge),
            format_flag(s.cell_communication_error),
            format_flag(s.serial_communication_error),
        ]
    }
}

// Capitalised so files stay comparable with logs written by earlier tooling
fn format_flag(value: bool) -> String {
    String::from(if value { "True" } else { "False" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn sample_record() -> LogRecord {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_micro_opt(23, 59, 30, 125_000)
            .unwrap();
        let snapshot = TelemetrySnapshot {
            pack_voltage: 52.5,
            charge_current: 12.5,
            discharge_current: 0.0,
            pack_current: -3.25,
            soc: 87,
            lowest_cell_voltage: 3.25,
            lowest_cell_voltage_num: 4,
            highest_cell_voltage: 3.375,
            highest_cell_voltage_num: 11,
            lowest_cell_temperature: 20.5,
            lowest_cell_temperature_num: 2,
            highest_cell_temperature: 24.0,
            highest_cell_temperature_num: 9,
            cell_count: 16,
            allowed_to_charge: true,
            allowed_to_discharge: true,
            cell_communication_error: false,
            serial_communication_error: false,
        };
        LogRecord::new(timestamp, "/dev/ttyUSB0", snapshot)
    }

    #[test]
    fn test_header_columns() {
        assert_eq!(COLUMNS.len(), 20);
        assert_eq!(COLUMNS[0], "Timestamp");
        assert_eq!(COLUMNS[1], "Port");
        assert_eq!(COLUMNS[19], "serial_communication_error");
    }

    #[test]
    fn test_fields_follow_column_order() {
        let fields = sample_record().fields();
        assert_eq!(fields.len(), COLUMNS.len());

        let expected = [
            "2024-01-15T23:59:30.125000",
            "/dev/ttyUSB0",
            "52.5",
            "12.5",
            "0",
            "-3.25",
            "87",
            "3.25",
            "4",
            "3.375",
            "11",
            "20.5",
            "2",
            "24",
            "9",
            "16",
            "True",
            "True",
            "False",
            "False",
        ];
        assert_eq!(fields, expected.map(String::from));
    }

    #[test]
    fn test_timestamp_keeps_full_precision() {
        let mut record = sample_record();
        record.timestamp = record.timestamp.with_nanosecond(123_456_000).unwrap();
        assert_eq!(record.fields()[0], "2024-01-15T23:59:30.123456");
    }

    #[test]
    fn test_communication_error_flags_are_data() {
        let mut record = sample_record();
        record.snapshot.serial_communication_error = true;
        record.snapshot.cell_communication_error = true;
        let fields = record.fields();
        assert_eq!(fields[18], "True");
        assert_eq!(fields[19], "True");
    }
}
