//! Decoding of the front panel display record returned by `GETD`.
//!
//! The record is 10 ASCII bytes:
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 0 - 3 | Measured voltage in centivolts, space padded on the right. |
//! | 4 - 7 | Measured current in centiamps, space padded on the right. |
//! | 8     | Control mode digit, `0` => CV, anything else => CC. |
//! | 9     | Unused. |

use core::ops::Range;

use strum_macros::EnumIter;

/// Length of the reply to `GETD`.
pub const DISPLAY_REPLY_LEN: usize = 10;

const VOLTAGE_FIELD: Range<usize> = 0..4;
const CURRENT_FIELD: Range<usize> = 4..8;
const MODE_FIELD: usize = 8;

/// Represents the two possible power supply control modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ControlMode {
    /// Constant voltage regulation mode.
    Cv,
    /// Constant current regulation mode.
    Cc,
}

impl ControlMode {
    /// Interpret the ASCII mode digit. Returns `None` for anything but a digit.
    pub fn from_ascii(digit: u8) -> Option<Self> {
        match digit {
            b'0' => Some(ControlMode::Cv),
            b'1'..=b'9' => Some(ControlMode::Cc),
            _ => None,
        }
    }
}

/// A snapshot of what the front panel is showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayReading {
    /// Measured output voltage in volts.
    pub voltage: f32,
    /// Measured output current in amps.
    pub current: f32,
    pub mode: ControlMode,
}

impl DisplayReading {
    pub fn is_constant_voltage(&self) -> bool {
        self.mode == ControlMode::Cv
    }

    /// Decode a complete display record.
    ///
    /// Returns `None` if the record is short or any field is not what we expect.
    /// Only trailing padding is stripped from the numeric fields, a leading space is malformed.
    pub fn decode(raw: &[u8]) -> Option<Self> {
        if raw.len() < DISPLAY_REPLY_LEN {
            return None;
        }
        Some(Self {
            voltage: parse_centi(&raw[VOLTAGE_FIELD])?,
            current: parse_centi(&raw[CURRENT_FIELD])?,
            mode: ControlMode::from_ascii(raw[MODE_FIELD])?,
        })
    }
}

impl From<DisplayReading> for (f32, f32, bool) {
    fn from(reading: DisplayReading) -> Self {
        (
            reading.voltage,
            reading.current,
            reading.is_constant_voltage(),
        )
    }
}

/// Parse a right-padded ASCII field holding hundredths of a unit.
fn parse_centi(field: &[u8]) -> Option<f32> {
    let text = core::str::from_utf8(field).ok()?.trim_end();
    // Signs and exponents are not something the PSU sends.
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let hundredths: f32 = text.parse().ok()?;
    Some(hundredths / 100.0)
}
