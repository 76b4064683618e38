//! We use this mocking module in unit tests to emulate the serial port and delay.

use core::fmt;

use crate::transport::Transport;

/// Our mock type used to emulate a serial port.
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, 256>,
    /// Bytes which have "arrived" and are waiting to be read
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer
    read_position: usize,
    /// Replies delivered one per write, emulating the PSU answering a command
    replies: heapless::Deque<heapless::Vec<u8, 16>, 8>,
    /// Largest number of bytes handed out by a single read
    max_chunk: usize,
    /// Number of times input was discarded
    discards: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Debug)]
pub enum MockSerialError {
    /// Simulated read timeout, no more data
    Timeout,
    /// Simulated buffer overflow
    BufferOverflow,
    /// Generic simulated error for testing
    SimulatedError,
}

impl fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::Timeout => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;

        // The PSU answers once it has seen a command.
        if let Some(reply) = self.replies.pop_front() {
            self.push_read_data(&reply)?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::Timeout);
        }

        let available_bytes = self.read_buffer.len() - self.read_position;
        let bytes_to_read = buf.len().min(available_bytes).min(self.max_chunk);

        buf[..bytes_to_read].copy_from_slice(
            &self.read_buffer[self.read_position..self.read_position + bytes_to_read],
        );

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl Transport for MockSerial {
    fn discard_input(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }
        self.read_buffer.clear();
        self.read_position = 0;
        self.discards += 1;
        Ok(())
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            replies: heapless::Deque::new(),
            max_chunk: usize::MAX,
            discards: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Set the data that is already waiting to be read.
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.push_read_data(data)
    }

    /// Queue a reply which becomes readable after the next write.
    pub fn queue_reply(&mut self, reply: &[u8]) -> Result<(), MockSerialError> {
        let reply = heapless::Vec::from_slice(reply).map_err(|_| MockSerialError::BufferOverflow)?;
        self.replies
            .push_back(reply)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    fn push_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Limit how many bytes each read returns, like a slow UART.
    pub fn set_max_chunk(&mut self, max_chunk: usize) {
        self.max_chunk = max_chunk.max(1);
    }

    /// How many times [`Transport::discard_input`] was called.
    pub fn discard_count(&self) -> usize {
        self.discards
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::delay::DelayNs;
    use embedded_io::{Error, Read, Write};

    #[test]
    fn test_write_data() {
        let mut mock = MockSerial::new();
        let test_data = b"VOLT125\r";

        let result = mock.write(test_data);
        assert_eq!(result.unwrap(), test_data.len());
        assert_eq!(mock.written_data(), test_data);
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let large_data = [0u8; 300]; // Larger than 256 byte capacity

        let result = mock.write(&large_data);
        assert!(matches!(result.unwrap_err(), MockSerialError::BufferOverflow));
    }

    #[test]
    fn test_reply_arrives_after_write() {
        let mut mock = MockSerial::new();
        mock.queue_reply(b"OK\r").unwrap();

        let mut buffer = [0u8; 3];
        assert!(matches!(mock.read(&mut buffer), Err(MockSerialError::Timeout)));

        mock.write(b"SOUT0\r").unwrap();
        assert_eq!(mock.read(&mut buffer).unwrap(), 3);
        assert_eq!(&buffer, b"OK\r");
    }

    #[test]
    fn test_replies_in_order() {
        let mut mock = MockSerial::new();
        mock.queue_reply(b"OK\r").unwrap();
        mock.queue_reply(b"ER\r").unwrap();

        let mut buffer = [0u8; 3];
        mock.write(b"VOLT010\r").unwrap();
        mock.read(&mut buffer).unwrap();
        assert_eq!(&buffer, b"OK\r");

        mock.write(b"CURR001\r").unwrap();
        mock.read(&mut buffer).unwrap();
        assert_eq!(&buffer, b"ER\r");
    }

    #[test]
    fn test_max_chunk() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Hello").unwrap();
        mock.set_max_chunk(2);

        let mut buffer = [0u8; 5];
        assert_eq!(mock.read(&mut buffer).unwrap(), 2);
        assert_eq!(&buffer[..2], b"He");
    }

    #[test]
    fn test_discard_input() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"stale").unwrap();
        mock.discard_input().unwrap();

        let mut buffer = [0u8; 5];
        assert!(matches!(mock.read(&mut buffer), Err(MockSerialError::Timeout)));
        assert_eq!(mock.discard_count(), 1);
    }

    #[test]
    fn test_write_error_simulation() {
        let mut mock = MockSerial::new();
        mock.set_write_error(true);

        assert!(matches!(
            mock.write(b"test").unwrap_err(),
            MockSerialError::SimulatedError
        ));
        assert!(mock.flush().is_err());
        assert_eq!(mock.written_data().len(), 0);
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            MockSerialError::Timeout.kind(),
            embedded_io::ErrorKind::TimedOut
        ));
        assert!(matches!(
            MockSerialError::SimulatedError.kind(),
            embedded_io::ErrorKind::Other
        ));
    }

    #[test]
    fn test_clear_written_data() {
        let mut mock = MockSerial::new();
        mock.write(b"test data").unwrap();
        mock.clear_written_data();
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn test_mock_delay_records() {
        let mut delay = MockDelay::default();
        delay.delay_ms(500);
        assert_eq!(delay.total_ns, 500_000_000);
    }
}
