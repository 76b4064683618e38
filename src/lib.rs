//! This crate provides an interface for controlling the BK Precision 1902B programmable power supply.
//!
//! It supports `no-std` environments, the `std` feature flag is only needed for the
//! `serialport` feature which opens the PSU on a host serial port.
//!
//! The PSU talks a small ASCII protocol, every command is terminated by a carriage return:
//!
//! | Command        | Wire form           | Reply                        |
//! |----------------|---------------------|------------------------------|
//! | Set voltage    | `VOLT` + 3 digits   | `OK\r`                       |
//! | Set current    | `CURR` + 3 digits   | `OK\r`                       |
//! | Enable output  | `SOUT0`             | `OK\r`                       |
//! | Disable output | `SOUT1`             | `OK\r`                       |
//! | Read display   | `GETD`              | 10 byte display record       |
//!
//! Setpoints are sent in tenths, e.g. 12.5V => `VOLT125`. See [`display`] for the layout of the
//! display record.
//!
//! The serial port used for PSU comms should be configured like so:
//! * Default baud rate: 9600
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//! * Read timeout: 1s

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod command;
pub mod config;
pub mod display;
pub mod encoding;
pub mod error;
pub mod psu;
#[cfg(feature = "serialport")]
pub mod serial;
pub mod transport;

pub use command::{Command, OutputMapping};
pub use config::Config;
pub use display::{ControlMode, DisplayReading};
pub use encoding::Setpoint;
pub use error::Error;
pub use psu::Bk1902b;
pub use transport::Transport;

#[cfg(test)]
mod mock_serial;
