//! What the driver needs from the serial link, on top of [embedded_io::Read] & [embedded_io::Write].

use embedded_io::{Error, ErrorKind};

/// A serial link the BK1902B is attached to.
///
/// Reads are expected to give up with [`ErrorKind::TimedOut`] once the port's read timeout
/// elapses, a short reply is then reported to the caller rather than waited on forever.
pub trait Transport: embedded_io::Read + embedded_io::Write {
    /// Throw away any received bytes which have not been read yet.
    fn discard_input(&mut self) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn discard_input(&mut self) -> Result<(), Self::Error> {
        T::discard_input(self)
    }
}

/// Fill `buf` from `interface`, stopping early if the read times out.
///
/// Returns how many bytes were received.
pub(crate) fn read_reply<S: embedded_io::Read>(
    interface: &mut S,
    buf: &mut [u8],
) -> Result<usize, S::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match interface.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(bytes_read) => filled += bytes_read,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut) => break,
            Err(e) => return Err(e),
        }
    }
    log::trace!("rx {:?}", &buf[..filled]);
    Ok(filled)
}
