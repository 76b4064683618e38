//! Opening a BK1902B on a host serial port, using the `serialport` crate.
//!
//! The port is closed when the [`Bk1902b`] (or the [`SerialTransport`] handed back by
//! [`Bk1902b::close`]) is dropped, including on early return and panic.

use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};

use crate::{
    config::{Config, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS},
    error::{Error, Result},
    psu::Bk1902b,
    transport::Transport,
};

/// Serial port settings used when opening the PSU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    /// How long a read waits before giving up on the reply.
    pub read_timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS.into()),
        }
    }
}

/// [`std::io::Error`] made usable as an [`embedded_io::Error`].
#[derive(Debug)]
pub struct IoError(pub std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serialport::Error> for IoError {
    fn from(err: serialport::Error) -> Self {
        IoError(err.into())
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            std::io::ErrorKind::OutOfMemory => embedded_io::ErrorKind::OutOfMemory,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

/// An open host serial port.
pub struct SerialTransport(Box<dyn SerialPort>);

impl SerialTransport {
    /// Open `path` with the given settings, 8N1.
    pub fn open(path: &str, settings: SerialSettings) -> core::result::Result<Self, IoError> {
        let port = serialport::new(path, settings.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(settings.read_timeout)
            .open()?;
        Ok(Self(port))
    }
}

impl embedded_io::ErrorType for SerialTransport {
    type Error = IoError;
}

impl embedded_io::Read for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for SerialTransport {
    fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> core::result::Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

impl Transport for SerialTransport {
    fn discard_input(&mut self) -> core::result::Result<(), Self::Error> {
        self.0.clear(ClearBuffer::Input).map_err(IoError::from)
    }
}

/// Blocks the thread for delays.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }
}

impl Bk1902b<SerialTransport, StdDelay> {
    /// Open the PSU on `path` (e.g. `/dev/ttyUSB0` or `COM3`) at `baud_rate`.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, IoError> {
        let settings = SerialSettings {
            baud_rate,
            ..SerialSettings::default()
        };
        Self::open_with(path, settings, Config::default())
    }

    pub fn open_with(path: &str, settings: SerialSettings, config: Config) -> Result<Self, IoError> {
        let transport = SerialTransport::open(path, settings).map_err(|err| {
            log::error!("{} unavailable: {}", path, err);
            Error::TransportUnavailable(err)
        })?;
        log::debug!("Opened {} at {} baud", path, settings.baud_rate);
        Ok(Self::with_config(transport, StdDelay, config))
    }
}

/// Open the PSU, run `f` with it, then close the port whatever `f` returned.
pub fn with_bk1902b<T, E, F>(path: &str, baud_rate: u32, f: F) -> core::result::Result<T, E>
where
    E: From<Error<IoError>>,
    F: FnOnce(&mut Bk1902b<SerialTransport, StdDelay>) -> core::result::Result<T, E>,
{
    let mut psu = Bk1902b::open(path, baud_rate)?;
    let result = f(&mut psu);
    drop(psu.close());
    log::debug!("Closed {}", path);
    result
}
