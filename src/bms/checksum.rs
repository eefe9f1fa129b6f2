//! # Frame Checksum
//!
//! The SmartBMS frame ends with the sum of all preceding bytes, modulo 256.

use super::protocol::{CHECKSUM_OFFSET, FRAME_LEN};

/// Sum bytes with wrap-around
///
/// # Examples
///
/// ```
/// use bms_logger::bms::checksum::additive_checksum;
///
/// assert_eq!(additive_checksum(&[0xFF, 0x02]), 0x01);
/// ```
pub fn additive_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}

/// Check whether `window` starts with a frame whose checksum matches
///
/// Returns false for windows shorter than one frame.
pub fn is_valid_frame(window: &[u8]) -> bool {
    if window.len() < FRAME_LEN {
        return false;
    }
    additive_checksum(&window[..CHECKSUM_OFFSET]) == window[CHECKSUM_OFFSET]
}
