//! The ASCII commands understood by the BK1902B.
//!
//! Every command is terminated by a carriage return. Setpoint commands carry a 3-digit
//! [`Magnitude`], the rest are fixed literals.

use strum_macros::EnumIter;

use crate::encoding::{MAGNITUDE_DIGITS, Magnitude};

/// Terminator for every command and reply.
pub const CR: u8 = b'\r';

pub const SET_VOLTAGE_OPCODE: &[u8; 4] = b"VOLT";
pub const SET_CURRENT_OPCODE: &[u8; 4] = b"CURR";
pub const GET_DISPLAY: &[u8] = b"GETD\r";

/// The output switch literals, indexed by their trailing digit.
pub const SOUT_LITERALS: [&[u8]; 2] = [b"SOUT0\r", b"SOUT1\r"];

/// Index into [`SOUT_LITERALS`] which turns the output on with [`OutputMapping::Standard`].
///
/// Two versions of the upstream driver disagree about this, so it has not been confirmed against
/// hardware. Use [`OutputMapping::Swapped`] if your unit behaves the other way round.
pub const OUTPUT_ENABLE_INDEX: usize = 0;

/// Index into [`SOUT_LITERALS`] which turns the output off with [`OutputMapping::Standard`].
pub const OUTPUT_DISABLE_INDEX: usize = 1;

/// Longest command frame: opcode + digits + CR.
pub const MAX_COMMAND_LEN: usize = 4 + MAGNITUDE_DIGITS + 1;

/// Which `SOUT` literal switches the output on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum OutputMapping {
    /// `SOUT0` enables, `SOUT1` disables.
    #[default]
    Standard,
    /// `SOUT1` enables, `SOUT0` disables.
    Swapped,
}

impl OutputMapping {
    /// The `SOUT` literal to send for the requested output state.
    pub fn literal(&self, enable: bool) -> &'static [u8] {
        let index = match (self, enable) {
            (OutputMapping::Standard, true) | (OutputMapping::Swapped, false) => {
                OUTPUT_ENABLE_INDEX
            }
            (OutputMapping::Standard, false) | (OutputMapping::Swapped, true) => {
                OUTPUT_DISABLE_INDEX
            }
        };
        SOUT_LITERALS[index]
    }
}

/// A single command to the PSU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetVoltage(Magnitude),
    SetCurrent(Magnitude),
    /// Switch the output, literal chosen by the [`OutputMapping`].
    Output {
        enable: bool,
        mapping: OutputMapping,
    },
    GetDisplay,
}

impl Command {
    /// Whether the PSU answers this command with `OK\r`.
    ///
    /// [`Command::GetDisplay`] is answered with the display record instead.
    pub fn expects_ack(&self) -> bool {
        !matches!(self, Command::GetDisplay)
    }

    /// The exact bytes to put on the wire.
    pub fn frame(&self) -> heapless::Vec<u8, MAX_COMMAND_LEN> {
        let mut frame = heapless::Vec::new();
        // Every variant fits in MAX_COMMAND_LEN, so the pushes below can't fail.
        match self {
            Command::SetVoltage(magnitude) => {
                let _ = frame.extend_from_slice(SET_VOLTAGE_OPCODE);
                let _ = frame.extend_from_slice(&magnitude.to_ascii());
                let _ = frame.push(CR);
            }
            Command::SetCurrent(magnitude) => {
                let _ = frame.extend_from_slice(SET_CURRENT_OPCODE);
                let _ = frame.extend_from_slice(&magnitude.to_ascii());
                let _ = frame.push(CR);
            }
            Command::Output { enable, mapping } => {
                let _ = frame.extend_from_slice(mapping.literal(*enable));
            }
            Command::GetDisplay => {
                let _ = frame.extend_from_slice(GET_DISPLAY);
            }
        }
        frame
    }
}
