//! Driver for the USB Infrared Toy's sampling mode protocol.
//!
//! The device speaks a half-duplex byte protocol over a serial port and is
//! always in exactly one mode. [`IrToy`] tracks that mode, captures signals
//! as raw timing bytes with [`IrToy::receive`] and plays them back with
//! [`IrToy::transmit`]. Between operations the device is always left in
//! sampling mode, which keeps the host side of the connection alive.
//!
//! Only firmware revision 22 and newer is supported.

use log::{debug, error, info, warn};
use pretty_hex::*;
use std::borrow::Cow;
use std::thread;

#[macro_use]
pub mod macros;

pub mod command;
pub mod config;
pub mod error;
pub mod response;
#[cfg(feature = "serial")]
pub mod serial;
pub mod traits;

#[cfg(test)]
mod testutils;

pub use command::Mode;
pub use config::Config;
pub use error::{Error, Result};
pub use response::{FirmwareInfo, TransmitReport};
pub use traits::Channel;

use command::{
    Command, END_OF_SIGNAL, IR_MODE, MAX_WRITE_SIZE, MIN_FIRMWARE_VERSION, RESET_SEQUENCE,
};

pub struct IrToy<'a, C: Channel + ?Sized> {
    channel: &'a mut C,
    config: Config,
    mode: Mode,
    firmware: FirmwareInfo,
    protocol_version: Option<[u8; 3]>,
    handshake: Option<u8>,
    report: Option<TransmitReport>,
}

impl<'a, C: Channel + ?Sized> IrToy<'a, C> {
    /// Connects to the device on `channel` using the default settle time.
    pub fn new(channel: &'a mut C) -> Result<Self> {
        Self::with_config(channel, Config::default())
    }

    /// Connects to the device on `channel`. The firmware revision is checked
    /// and the device is left in sampling mode.
    pub fn with_config(channel: &'a mut C, config: Config) -> Result<Self> {
        channel.flush_output()?;
        let mut toy = IrToy {
            channel,
            config,
            mode: Mode::Idle,
            firmware: FirmwareInfo::default(),
            protocol_version: None,
            handshake: None,
            report: None,
        };

        let firmware = toy.firmware_revision()?;
        if firmware.firmware < MIN_FIRMWARE_VERSION {
            error!(
                "Firmware v{} is too old, v{} or newer is required",
                firmware.firmware, MIN_FIRMWARE_VERSION
            );
            return Err(Error::FirmwareVersion {
                required: MIN_FIRMWARE_VERSION,
                found: firmware.firmware,
            });
        }

        toy.enter_sampling_mode()?;
        Ok(toy)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The revision reported by the most recent version query.
    pub fn firmware(&self) -> FirmwareInfo {
        self.firmware
    }

    /// The 3 bytes the device sent when sampling mode was last entered.
    pub fn protocol_version(&self) -> Option<&[u8; 3]> {
        self.protocol_version.as_ref()
    }

    /// The most recent handshake byte. During a transmit this is overwritten
    /// for every chunk, so only the last chunk's byte remains.
    pub fn handshake(&self) -> Option<u8> {
        self.handshake
    }

    /// The report from the most recent transmit which got far enough to
    /// receive one, whether or not it succeeded.
    pub fn last_report(&self) -> Option<TransmitReport> {
        self.report
    }

    pub fn channel(&self) -> &C {
        &*self.channel
    }

    /// Queries the hardware and firmware revision. This resets the device,
    /// so it is left in idle mode afterwards.
    pub fn firmware_revision(&mut self) -> Result<FirmwareInfo> {
        self.reset()?;
        self.write_list(&[u8::from(Command::Version)], false)?;
        self.settle();

        let mut reply = [0u8; 4];
        self.channel.read_exact(&mut reply)?;
        let firmware = FirmwareInfo::parse(&reply)?;
        info!("IrToy - {}", firmware);
        self.firmware = firmware;
        Ok(firmware)
    }

    /// Returns the device to idle mode and clears its buffer. Safe to call
    /// in any mode.
    pub fn reset(&mut self) -> Result<()> {
        self.settle();
        self.write_list(&RESET_SEQUENCE, false)?;
        self.set_mode(Mode::Idle);
        self.settle();
        info!("IrToy - Reset");
        Ok(())
    }

    /// Puts the device into sampling mode, the mode used for receiving and
    /// as the resting state between operations.
    ///
    /// The device switches as soon as it sees the `S` command, so the mode is
    /// `Sampling` from then on even if reading the protocol version fails.
    pub fn enter_sampling_mode(&mut self) -> Result<()> {
        self.reset()?;
        self.write_list(&[u8::from(Command::Sampling)], false)?;
        self.set_mode(Mode::Sampling);
        self.settle();

        let mut version = [0u8; 3];
        self.channel.read_exact(&mut version)?;
        debug!("Sampling protocol version {:?}", (&version[..]).hex_dump());
        self.protocol_version = Some(version);
        self.settle();
        Ok(())
    }

    /// Puts the device into IR (IRman decoder) mode. Neither `receive` nor
    /// `transmit` use this mode; both switch back to sampling mode first.
    pub fn enter_infrared_mode(&mut self) -> Result<()> {
        self.reset()?;
        self.write_list(IR_MODE, false)?;
        self.settle();
        self.set_mode(Mode::Infrared);
        Ok(())
    }

    /// Waits for an infrared signal and returns it as raw timing bytes.
    ///
    /// The device ends a capture by sending `0xff 0xff` after 1.7 seconds
    /// without infrared activity. This call blocks until that terminator
    /// arrives, so any timeout has to come from the channel. The returned
    /// bytes include the terminator and can be passed straight to
    /// [`IrToy::transmit`].
    pub fn receive(&mut self) -> Result<Vec<u8>> {
        self.settle();
        self.enter_sampling_mode()?;

        let mut code = Vec::new();
        loop {
            let byte = self.channel.read_byte()?;
            code.push(byte);
            let len = code.len();
            if len >= 3 && byte == 0xff && code[len - 2] == 0xff {
                break;
            }
        }
        debug!("Received {} bytes {:?}", code.len(), (&code[..]).hex_dump());

        self.settle();
        Ok(code)
    }

    /// Transmits `code` as an infrared signal.
    ///
    /// `code` must hold an even number of bytes, at least two. If it doesn't
    /// already end with `0xff 0xff` the terminator is added to the bytes
    /// sent; `code` itself is left untouched. On any failure the device is
    /// reset and put back into sampling mode before the error is returned.
    pub fn transmit(&mut self, code: &[u8]) -> Result<TransmitReport> {
        if code.len() < 2 {
            return Err(Error::InvalidArgument(
                "code must contain at least two bytes",
            ));
        }
        if code.len() % 2 != 0 {
            return Err(Error::InvalidArgument(
                "code must contain an even number of bytes",
            ));
        }
        let code = terminated(code);

        match self.transmit_sequence(&code) {
            Ok(report) => {
                self.enter_sampling_mode()?;
                Ok(report)
            }
            Err(err) => {
                warn!("Transmit failed: {}, resetting device", err);
                self.recover();
                Err(err)
            }
        }
    }

    fn transmit_sequence(&mut self, code: &[u8]) -> Result<TransmitReport> {
        self.settle();
        self.enter_transmit_mode()?;
        self.settle();
        self.write_list(code, true)?;
        self.settle();

        let report = self.read_transmit_report()?;
        self.report = Some(report);
        debug!("Transmit report: {}", report);
        if !report.is_complete() {
            return Err(Error::IrTransmit {
                flag: report.complete,
            });
        }
        Ok(report)
    }

    fn enter_transmit_mode(&mut self) -> Result<()> {
        self.settle();
        self.write_list(&[u8::from(Command::TransmitHandshake)], false)?;
        self.write_list(&[u8::from(Command::NotifyOnComplete)], false)?;
        self.write_list(&[u8::from(Command::TransmitData)], true)?;
        self.set_mode(Mode::Transmit);
        Ok(())
    }

    fn read_transmit_report(&mut self) -> Result<TransmitReport> {
        let mut count = [0u8; 3];
        self.channel.read_exact(&mut count)?;
        let complete = self.channel.read_byte()?;
        Ok(TransmitReport::parse(&count, complete))
    }

    // Gets the device back into a known state after a failed transmit. The
    // caller gets the original error, so a failure here is only logged.
    fn recover(&mut self) {
        let result = self.reset().and_then(|_| self.enter_sampling_mode());
        if let Err(err) = result {
            error!("Unable to recover device after failed transmit: {}", err);
        }
    }

    // Writes `bytes` in chunks the device buffer can take, optionally
    // reading a handshake byte after each one.
    fn write_list(&mut self, bytes: &[u8], check_handshake: bool) -> Result<()> {
        self.settle();

        let mut written = 0;
        for chunk in bytes.chunks(MAX_WRITE_SIZE) {
            written += self.channel.write(chunk)?;
            if check_handshake {
                let handshake = self.channel.read_byte()?;
                debug!("Handshake 0x{:02x}", handshake);
                self.handshake = Some(handshake);
            }
        }

        if written != bytes.len() {
            return Err(Error::WriteCount {
                expected: bytes.len(),
                written,
            });
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("Mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    fn settle(&self) {
        if !self.config.settle_time.is_zero() {
            debug!("sleep");
            thread::sleep(self.config.settle_time);
        }
    }
}

// Returns `code` with the end of signal marker appended if it's missing.
fn terminated(code: &[u8]) -> Cow<'_, [u8]> {
    if code.ends_with(&END_OF_SIGNAL) {
        Cow::Borrowed(code)
    } else {
        let mut owned = code.to_vec();
        owned.extend_from_slice(&END_OF_SIGNAL);
        Cow::Owned(owned)
    }
}

// ===========================================================================
//
// Tests
//
// ===========================================================================
