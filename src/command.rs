use core::fmt;

/// Firmware revisions below this one don't implement the sampling mode
/// transmit handshake the driver relies on.
pub const MIN_FIRMWARE_VERSION: u8 = 22;

/// Largest chunk written to the device at a time. The device buffer holds
/// 62 bytes (31 samples), but writing 31 at a time hangs it while 32 is
/// reliable.
pub const MAX_WRITE_SIZE: usize = 32;

/// Five zeros put the device back into its idle state from anywhere, since
/// zero is never a valid byte in the middle of a command.
pub const RESET_SEQUENCE: [u8; 5] = [0x00; 5];

/// Marks the end of a signal, both in captured samples and in codes
/// written for transmission.
pub const END_OF_SIGNAL: [u8; 2] = [0xff, 0xff];

/// Switches the device into IR (IRman decoder) mode.
pub const IR_MODE: &[u8] = b"IR";

// Single byte commands understood by the device. The transmit setup
// commands are only meaningful once sampling mode is active.
c_like_enum! {
  Command {
    Reset             = 0x00,
    TransmitData      = 0x03,
    NotifyOnComplete  = 0x25,
    TransmitHandshake = 0x26,
    Sampling          = b'S',
    Version           = b'v',
  }
}

/// The mode the device is currently in. The driver keeps this in step
/// with every command it sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Sampling,
    Transmit,
    Infrared,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle => "idle",
            Mode::Sampling => "sampling",
            Mode::Transmit => "transmit",
            Mode::Infrared => "infrared",
        };
        f.write_str(name)
    }
}
