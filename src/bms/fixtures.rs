//! Raw frame construction for tests.

use super::checksum::additive_checksum;
use super::protocol::*;

/// Builds raw SmartBMS frames field by field and seals the checksum
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    frame: [u8; FRAME_LEN],
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self { frame: [0u8; FRAME_LEN] }
    }

    /// A healthy 16-cell pack, charging
    ///
    /// Decodes to 52.35 V, 12.5 A in, 2.0 A out, 10.5 A net, 87% SOC,
    /// cells 3.255 V (#4) to 3.29 V (#11), 20.815 °C (#2) to 24.243 °C (#9).
    pub fn typical() -> Self {
        Self::new()
            .pack_voltage_raw(10_470)
            .charge_current(b'+', 100)
            .discharge_current(b'+', 16)
            .pack_current(b'+', 84)
            .lowest_cell(651, 4)
            .highest_cell(658, 11)
            .lowest_temperature(295, 2)
            .highest_temperature(299, 9)
            .cell_count(16)
            .flags(FLAG_ALLOWED_TO_CHARGE | FLAG_ALLOWED_TO_DISCHARGE)
            .soc(87)
    }

    pub fn pack_voltage_raw(mut self, raw: u32) -> Self {
        let bytes = raw.to_be_bytes();
        self.frame[PACK_VOLTAGE_OFFSET..PACK_VOLTAGE_OFFSET + 3].copy_from_slice(&bytes[1..]);
        self
    }

    pub fn charge_current(self, sign: u8, raw: u16) -> Self {
        self.current(CHARGE_CURRENT_OFFSET, sign, raw)
    }

    pub fn discharge_current(self, sign: u8, raw: u16) -> Self {
        self.current(DISCHARGE_CURRENT_OFFSET, sign, raw)
    }

    pub fn pack_current(self, sign: u8, raw: u16) -> Self {
        self.current(PACK_CURRENT_OFFSET, sign, raw)
    }

    pub fn lowest_cell(self, raw: u16, num: u8) -> Self {
        self.word_and_index(LOWEST_CELL_VOLTAGE_OFFSET, raw, num)
    }

    pub fn highest_cell(self, raw: u16, num: u8) -> Self {
        self.word_and_index(HIGHEST_CELL_VOLTAGE_OFFSET, raw, num)
    }

    pub fn lowest_temperature(self, raw: u16, num: u8) -> Self {
        self.word_and_index(LOWEST_CELL_TEMPERATURE_OFFSET, raw, num)
    }

    pub fn highest_temperature(self, raw: u16, num: u8) -> Self {
        self.word_and_index(HIGHEST_CELL_TEMPERATURE_OFFSET, raw, num)
    }

    pub fn cell_count(mut self, count: u8) -> Self {
        self.frame[CELL_COUNT_OFFSET] = count;
        self
    }

    pub fn flags(mut self, flags: u8) -> Self {
        self.frame[FLAGS_OFFSET] = flags;
        self
    }

    pub fn soc(mut self, soc: u8) -> Self {
        self.frame[SOC_OFFSET] = soc;
        self
    }

    pub fn build(mut self) -> [u8; FRAME_LEN] {
        self.frame[CHECKSUM_OFFSET] = additive_checksum(&self.frame[..CHECKSUM_OFFSET]);
        self.frame
    }

    fn current(mut self, offset: usize, sign: u8, raw: u16) -> Self {
        self.frame[offset] = sign;
        self.frame[offset + 1..offset + 3].copy_from_slice(&raw.to_be_bytes());
        self
    }

    fn word_and_index(mut self, offset: usize, raw: u16, num: u8) -> Self {
        self.frame[offset..offset + 2].copy_from_slice(&raw.to_be_bytes());
        self.frame[offset + 2] = num;
        self
    }
}
