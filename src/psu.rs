use embedded_hal::delay::DelayNs;

use crate::{
    command::Command,
    config::Config,
    display::{DISPLAY_REPLY_LEN, DisplayReading},
    encoding::{Magnitude, Setpoint, SetpointRange},
    error::{Error, Result},
    transport::{Transport, read_reply},
};

/// Acknowledgement sent by the PSU after every setting command.
pub const ACK_REPLY: &[u8; ACK_REPLY_LEN] = b"OK\r";

/// Length of [`ACK_REPLY`].
pub const ACK_REPLY_LEN: usize = 3;

/// You can create a Bk1902b using any interface which implements [embedded_io::Read],
/// [embedded_io::Write] & [Transport], plus something to wait with.
///
/// Holding a `Bk1902b` means the port is open. Every method is one complete command and reply
/// cycle, nothing is remembered between calls.
pub struct Bk1902b<S: Transport, D: DelayNs> {
    interface: S,
    delay: D,
    config: Config,
}

impl<S: Transport, D: DelayNs> Bk1902b<S, D> {
    /// Create a new Bk1902b with the default [`Config`].
    pub fn new(interface: S, delay: D) -> Self {
        Self::with_config(interface, delay, Config::default())
    }

    pub fn with_config(interface: S, delay: D, config: Config) -> Self {
        Self {
            interface,
            delay,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Finish with the PSU, handing back the interface.
    pub fn close(self) -> S {
        self.interface
    }

    /// Set the output voltage in volts, clamped to 1.0 - 60.0V.
    ///
    /// The returned [`Setpoint`] says what was actually sent.
    pub fn set_voltage(&mut self, voltage: f32) -> Result<Setpoint, S::Error> {
        let setpoint = SetpointRange::VOLTAGE.clamp(voltage)?;
        if setpoint.was_clamped() {
            log::warn!(
                "Voltage {}V out of range, clamped to {}V",
                setpoint.requested,
                setpoint.applied
            );
        }
        let magnitude = Magnitude::encode(setpoint.applied)?;
        self.send_command(Command::SetVoltage(magnitude))?;
        Ok(setpoint)
    }

    /// Set the output current limit in amps, clamped to 0.0 - 15.0A.
    ///
    /// The returned [`Setpoint`] says what was actually sent.
    pub fn set_current(&mut self, current: f32) -> Result<Setpoint, S::Error> {
        let setpoint = SetpointRange::CURRENT.clamp(current)?;
        if setpoint.was_clamped() {
            log::warn!(
                "Current {}A out of range, clamped to {}A",
                setpoint.requested,
                setpoint.applied
            );
        }
        let magnitude = Magnitude::encode(setpoint.applied)?;
        self.send_command(Command::SetCurrent(magnitude))?;
        Ok(setpoint)
    }

    /// Enable the output.
    pub fn enable_output(&mut self) -> Result<(), S::Error> {
        self.send_command(Command::Output {
            enable: true,
            mapping: self.config.output_mapping,
        })
    }

    /// Disable the output.
    pub fn disable_output(&mut self) -> Result<(), S::Error> {
        self.send_command(Command::Output {
            enable: false,
            mapping: self.config.output_mapping,
        })
    }

    /// Read the measured voltage, current and CV/CC mode from the front display.
    pub fn read_display(&mut self) -> Result<DisplayReading, S::Error> {
        // Anything left over from an earlier exchange would shift the record.
        self.interface
            .discard_input()
            .map_err(Error::SerialError)?;
        self.write_frame(Command::GetDisplay)?;

        let mut buff = [0u8; DISPLAY_REPLY_LEN];
        let received = read_reply(&mut self.interface, &mut buff).map_err(Error::SerialError)?;
        let raw = &buff[..received];

        DisplayReading::decode(raw).ok_or_else(|| {
            log::warn!("Malformed display reply {:?}", raw);
            Error::MalformedReply {
                // raw is never longer than the capacity.
                raw: heapless::Vec::from_slice(raw).unwrap_or_default(),
            }
        })
    }

    /// Send a command and wait for the PSU to acknowledge it.
    ///
    /// This does not retry, a rejected command is returned to the caller as
    /// [`Error::CommandRejected`] together with whatever the PSU replied.
    ///
    /// Commands which are not answered with `OK\r` are refused without writing anything, use
    /// [`Self::read_display`] for [`Command::GetDisplay`].
    pub fn send_command(&mut self, command: Command) -> Result<(), S::Error> {
        if !command.expects_ack() {
            return Err(Error::NotAcknowledged(command));
        }
        self.write_frame(command)?;

        // The PSU needs a moment before its reply is ready.
        self.delay.delay_ms(self.config.settle_delay.to_millis());

        let mut buff = [0u8; ACK_REPLY_LEN];
        let received = read_reply(&mut self.interface, &mut buff).map_err(Error::SerialError)?;
        let reply = &buff[..received];

        if reply != ACK_REPLY {
            log::warn!("{:?} rejected, reply {:?}", command, reply);
            return Err(Error::CommandRejected {
                command,
                reply: heapless::Vec::from_slice(reply).unwrap_or_default(),
            });
        }
        log::debug!("{:?} acknowledged", command);
        Ok(())
    }

    fn write_frame(&mut self, command: Command) -> Result<(), S::Error> {
        let frame = command.frame();
        log::trace!("tx {:?}", frame.as_slice());
        self.interface
            .write_all(&frame)
            .map_err(Error::SerialError)?;
        self.interface.flush().map_err(Error::SerialError)
    }
}
