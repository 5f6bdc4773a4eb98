use core::fmt;
use core::str;

use crate::error::{Error, Result};

/// Hardware and firmware revision reported by the `v` command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareInfo {
    pub hardware: u8,
    pub firmware: u8,
}

impl FirmwareInfo {
    /// Parses the 4 byte version reply. The first byte is a tag, followed by
    /// one ASCII digit of hardware version and two ASCII digits of firmware
    /// version, e.g. `V222`.
    pub fn parse(bytes: &[u8; 4]) -> Result<Self> {
        let bad = || Error::BadResponse {
            what: "version",
            bytes: bytes.to_vec(),
        };
        let hardware = parse_decimal(&bytes[1..2]).ok_or_else(bad)?;
        let firmware = parse_decimal(&bytes[2..4]).ok_or_else(bad)?;
        Ok(Self { hardware, firmware })
    }
}

impl fmt::Display for FirmwareInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hardware v{} firmware v{}", self.hardware, self.firmware)
    }
}

fn parse_decimal(digits: &[u8]) -> Option<u8> {
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    str::from_utf8(digits).ok()?.parse().ok()
}

/// Result of a transmit, as reported by the device once the signal has
/// been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitReport {
    /// Number of code bytes the device says it received.
    pub byte_count: u16,
    /// Completion flag, `c` or `C` on success.
    pub complete: u8,
}

impl TransmitReport {
    /// Builds a report from the 3 byte count reply and the completion flag.
    /// The first count byte is a tag and is ignored. The other two have
    /// always been read by hex-encoding them and parsing the text, which is
    /// the same as reading them as a big-endian `u16`.
    pub fn parse(count: &[u8; 3], complete: u8) -> Self {
        Self {
            byte_count: u16::from_be_bytes([count[1], count[2]]),
            complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete == b'c' || self.complete == b'C'
    }
}

impl fmt::Display for TransmitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes, completion flag {:?}",
            self.byte_count, self.complete as char
        )
    }
}
