//! Setpoint clamping and the 3-digit magnitude used on the wire.
//!
//! The BK1902B takes voltage and current setpoints as the value in tenths, rendered as exactly
//! three zero-padded ASCII digits. E.g. 12.5V => `125`, 1.0V => `010`.

use thiserror::Error;

/// Number of ASCII digits in an encoded magnitude.
pub const MAGNITUDE_DIGITS: usize = 3;

/// Largest raw magnitude that fits in [`MAGNITUDE_DIGITS`] digits.
pub const MAX_MAGNITUDE: u16 = 999;

/// How far below a whole tenth an `f32` input may land through representation error alone.
///
/// An `f32` below 100 is within 4e-6 of the decimal it was written as, i.e. 4e-5 tenths.
const F32_TENTHS_EPSILON: f64 = 1e-4;

/// Problems with a requested setpoint or the range it is checked against.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SetpointError {
    #[error("Invalid range, minimum {min} is above maximum {max}")]
    InvalidRange { min: f32, max: f32 },
    #[error("Value {0} cannot be encoded in three digits")]
    OutOfEncoderRange(f32),
    #[error("Setpoint is not a number")]
    NotANumber,
}

/// A closed `[min, max]` range a setpoint is forced into before it is sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointRange {
    min: f32,
    max: f32,
}

impl SetpointRange {
    /// Output voltage range, in volts.
    pub const VOLTAGE: Self = Self {
        min: 1.0,
        max: 60.0,
    };

    /// Output current limit range, in amps.
    pub const CURRENT: Self = Self {
        min: 0.0,
        max: 15.0,
    };

    /// Create a range. Fails if `min > max`, the range is never silently repaired.
    pub fn new(min: f32, max: f32) -> Result<Self, SetpointError> {
        // Written so a NaN bound also fails.
        if !(min <= max) {
            return Err(SetpointError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Force `value` into this range.
    ///
    /// The returned [`Setpoint`] keeps both the requested and the applied value so the caller can
    /// tell whether clamping happened.
    pub fn clamp(&self, value: f32) -> Result<Setpoint, SetpointError> {
        if value.is_nan() {
            return Err(SetpointError::NotANumber);
        }
        let applied = if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        };
        Ok(Setpoint {
            requested: value,
            applied,
        })
    }
}

/// Clamp `value` into `[min, max]`.
pub fn clamp(value: f32, min: f32, max: f32) -> Result<Setpoint, SetpointError> {
    SetpointRange::new(min, max)?.clamp(value)
}

/// Outcome of clamping a requested value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoint {
    /// What the caller asked for.
    pub requested: f32,
    /// What will actually be sent to the PSU.
    pub applied: f32,
}

impl Setpoint {
    /// Whether the requested value was outside of the valid range.
    pub fn was_clamped(&self) -> bool {
        self.requested != self.applied
    }
}

/// A setpoint in tenths of a unit, guaranteed to fit in three digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magnitude(u16);

impl Magnitude {
    /// Encode a physical value, truncating toward zero at the tenths digit.
    ///
    /// Values outside of 0.0 - 99.9 are rejected rather than wrapped.
    pub fn encode(value: f32) -> Result<Self, SetpointError> {
        if value.is_nan() {
            return Err(SetpointError::NotANumber);
        }
        let tenths = f64::from(value) * 10.0;
        if !(0.0..f64::from(MAX_MAGNITUDE + 1)).contains(&tenths) {
            return Err(SetpointError::OutOfEncoderRange(value));
        }
        let truncated = tenths as u16;
        // 2.3f32 is 2.2999999523, which must still give `023`.
        let raw = if f64::from(truncated + 1) - tenths <= F32_TENTHS_EPSILON {
            truncated + 1
        } else {
            truncated
        };
        Ok(Self(raw.min(MAX_MAGNITUDE)))
    }

    pub fn raw(&self) -> u16 {
        self.0
    }

    /// The physical value this magnitude represents.
    pub fn value(&self) -> f32 {
        self.0 as f32 / 10.0
    }

    /// The zero-padded ASCII digits, e.g. `b"010"` for 1.0.
    pub fn to_ascii(&self) -> [u8; MAGNITUDE_DIGITS] {
        let raw = self.0;
        [
            b'0' + (raw / 100) as u8,
            b'0' + (raw / 10 % 10) as u8,
            b'0' + (raw % 10) as u8,
        ]
    }
}
