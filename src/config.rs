//! Driver settings which depend on the particular unit and its firmware.

use fugit::MillisDurationU32;

use crate::command::OutputMapping;

/// Default serial baud rate of the BK1902B.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Recommended read timeout for the serial port, in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 1000;

/// The PSU isn't ready to answer straight after a command, this is how long we wait.
pub const DEFAULT_SETTLE_DELAY: MillisDurationU32 = MillisDurationU32::millis(500);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Pause between sending a command and reading its acknowledgement.
    ///
    /// Firmware timing has not been characterised, tune this if replies arrive late.
    pub settle_delay: MillisDurationU32,
    /// Which `SOUT` literal enables the output.
    pub output_mapping: OutputMapping,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            output_mapping: OutputMapping::Standard,
        }
    }
}

impl Config {
    pub fn with_settle_delay(mut self, settle_delay: MillisDurationU32) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_output_mapping(mut self, output_mapping: OutputMapping) -> Self {
        self.output_mapping = output_mapping;
        self
    }
}
