//! # Snapshot Viewer
//!
//! Human-readable rendering of one source's readings.

use std::fmt;

use crate::bms::protocol::TelemetrySnapshot;

/// Readings of one port, formatted for a terminal
#[derive(Debug, Clone, Copy)]
pub struct SnapshotReport<'a> {
    pub port: &'a str,
    pub snapshot: &'a TelemetrySnapshot,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

impl fmt::Display for SnapshotReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        writeln!(f, "Data from port {}:", self.port)?;
        writeln!(f, "Pack Voltage: {} V", s.pack_voltage)?;
        writeln!(f, "Charge Current: {} A", s.charge_current)?;
        writeln!(f, "Discharge Current: {} A", s.discharge_current)?;
        writeln!(f, "Pack Current: {} A", s.pack_current)?;
        writeln!(f, "State of Charge (SOC): {}%", s.soc)?;
        writeln!(
            f,
            "Lowest Cell Voltage: {} V (Cell {})",
            s.lowest_cell_voltage, s.lowest_cell_voltage_num
        )?;
        writeln!(
            f,
            "Highest Cell Voltage: {} V (Cell {})",
            s.highest_cell_voltage, s.highest_cell_voltage_num
        )?;
        writeln!(
            f,
            "Lowest Cell Temperature: {}°C (Cell {})",
            s.lowest_cell_temperature, s.lowest_cell_temperature_num
        )?;
        writeln!(
            f,
            "Highest Cell Temperature: {}°C (Cell {})",
            s.highest_cell_temperature, s.highest_cell_temperature_num
        )?;
        writeln!(f, "Cell Count: {}", s.cell_count)?;
        writeln!(f, "Allowed to Charge: {}", yes_no(s.allowed_to_charge))?;
        writeln!(f, "Allowed to Discharge: {}", yes_no(s.allowed_to_discharge))?;
        writeln!(f, "Cell Communication Error: {}", yes_no(s.cell_communication_error))?;
        writeln!(f, "Serial Communication Error: {}", yes_no(s.serial_communication_error))?;
        write!(f, "{}", "-".repeat(80))
    }
}
