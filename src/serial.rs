//! [`Channel`] implementation backed by a real serial port.

use log::{debug, info};
use serialport::{ClearBuffer, SerialPort};
use std::io::{self, Read, Write};
use std::time::Duration;

use crate::traits::Channel;

/// The IR Toy enumerates as a CDC-ACM device, so the baud rate is nominal.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

// Per-read timeout on the port. Reads are retried after a timeout, so this
// only controls how often the retry loop wakes up.
const POLL_TIMEOUT: Duration = Duration::from_millis(500);

pub struct SerialChannel {
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    pub fn open(path: &str, baud_rate: u32) -> io::Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(POLL_TIMEOUT)
            .open()?;
        info!("Opened {} at {} baud", path, baud_rate);
        Ok(Self::from_port(port))
    }

    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialChannel { port }
    }

    pub fn into_port(self) -> Box<dyn SerialPort> {
        self.port
    }
}

impl Channel for SerialChannel {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let written = self.port.write(bytes)?;
        self.port.flush()?;
        Ok(written)
    }

    // Blocks until `buf` is full. The driver relies on the device to end a
    // capture, so timeouts are not errors here.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "serial port closed",
                    ))
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    debug!("read timed out with {} of {} bytes, waiting", filled, buf.len());
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn flush_output(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::Output)?;
        Ok(())
    }
}
