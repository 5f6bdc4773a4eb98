//! Error types for the IR Toy driver.
//!
//! Every fallible driver operation returns [`Result<T>`]. Failures during a
//! transmit are reported only after the device has been put back into
//! sampling mode, so the error always describes the original fault rather
//! than anything that happened while recovering.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device firmware is older than the driver supports.
    #[error("firmware version {found} is not supported, version {required} or newer is required")]
    FirmwareVersion { required: u8, found: u8 },

    /// A code passed to `transmit` was too short or had an odd length.
    #[error("invalid code: {0}")]
    InvalidArgument(&'static str),

    /// The device accepted fewer code bytes than were sent.
    #[error("incorrect number of bytes written to device: expected {expected}, wrote {written}")]
    WriteCount { expected: usize, written: usize },

    /// The device finished a transmit without reporting success.
    #[error("failed to transmit IR code, completion flag 0x{flag:02x}")]
    IrTransmit { flag: u8 },

    /// A fixed size reply from the device could not be decoded.
    #[error("malformed {what} response: {bytes:02x?}")]
    BadResponse { what: &'static str, bytes: Vec<u8> },

    /// The underlying channel failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
