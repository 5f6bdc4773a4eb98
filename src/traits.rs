use std::io;

/// A duplex byte stream connected to the device, typically a serial port.
///
/// The driver borrows a channel for its whole lifetime but never opens or
/// closes it. Any timeouts belong here: the driver itself waits as long as
/// the channel does.
pub trait Channel {
    /// Writes some bytes to the device and returns how many were accepted.
    /// A short count is not an error at this level; the driver checks the
    /// totals itself.
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize>;

    /// Fills `buf` completely, blocking until enough bytes have arrived.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Discards anything queued for output that hasn't been sent yet.
    fn flush_output(&mut self) -> io::Result<()>;

    /// Reads a single byte.
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}
