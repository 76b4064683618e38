//! Our error types for the BK1902B.

use thiserror::Error;

use crate::{
    command::Command,
    display::DISPLAY_REPLY_LEN,
    encoding::SetpointError,
    psu::ACK_REPLY_LEN,
};

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for BK1902B communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Serial port unavailable")]
    TransportUnavailable(I),
    #[error("Setpoint error: {0}")]
    Setpoint(SetpointError),
    #[error("Command {command:?} rejected, reply received: {reply:?}")]
    CommandRejected {
        command: Command,
        /// Whatever arrived before the read timed out, possibly fewer than 3 bytes.
        reply: heapless::Vec<u8, ACK_REPLY_LEN>,
    },
    #[error("Command {0:?} is not answered with an acknowledgement")]
    NotAcknowledged(Command),
    #[error("Malformed display reply: {raw:?}")]
    MalformedReply {
        raw: heapless::Vec<u8, DISPLAY_REPLY_LEN>,
    },
}

impl<I: embedded_io::Error> From<SetpointError> for Error<I> {
    fn from(err: SetpointError) -> Self {
        Error::Setpoint(err)
    }
}
