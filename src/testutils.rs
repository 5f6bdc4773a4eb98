use log::{debug, info};
use pretty_hex::*;
use simple_logger;
use std::collections::VecDeque;
use std::io;
use std::sync::Once;
use std::vec::Vec;

use super::command::{Command, END_OF_SIGNAL, RESET_SEQUENCE};
use super::traits::Channel;

static INIT: Once = Once::new();

pub fn setup_log() {
    INIT.call_once(|| {
        simple_logger::init().unwrap();
    });
}

/// Byte the simulated device sends back to acknowledge the transmit data
/// command. Each data chunk is acknowledged with its 1-based chunk number.
pub const HANDSHAKE: u8 = 62;

/// Reply to the `S` command.
pub const PROTOCOL_VERSION: &[u8; 3] = b"S01";

#[derive(Debug, Clone, Copy, PartialEq)]
enum DeviceState {
    Idle,
    Sampling,
    Infrared,
    TransmitData,
}

/// Simulates an IR Toy on the far end of a channel. Commands written to it
/// queue the replies the real device would send, and everything written is
/// recorded for inspection.
pub struct MockDevice {
    state: DeviceState,
    version: [u8; 4],
    completion_flag: u8,
    short_data_writes: bool,
    mute_transmit: bool,
    mute_sampling: bool,
    last_command: u8,
    pending: VecDeque<u8>,
    signal: VecDeque<u8>,
    code: Vec<u8>,
    written: Vec<u8>,
    data_chunks: Vec<usize>,
    flushes: usize,
}

impl MockDevice {
    pub fn new() -> Self {
        MockDevice {
            state: DeviceState::Idle,
            version: *b"V222",
            completion_flag: b'C',
            short_data_writes: false,
            mute_transmit: false,
            mute_sampling: false,
            last_command: 0,
            pending: VecDeque::new(),
            signal: VecDeque::new(),
            code: Vec::new(),
            written: Vec::new(),
            data_chunks: Vec::new(),
            flushes: 0,
        }
    }

    /// Sets the 4 byte reply to the version command.
    pub fn with_version(mut self, version: &[u8; 4]) -> Self {
        self.version = *version;
        self
    }

    /// Sets the completion flag sent at the end of every transmit.
    pub fn with_completion_flag(mut self, flag: u8) -> Self {
        self.completion_flag = flag;
        self
    }

    /// Makes the device accept one byte less than offered for every chunk
    /// of transmit data.
    pub fn with_short_data_writes(mut self) -> Self {
        self.short_data_writes = true;
        self
    }

    /// Makes the device stop answering once it has been asked for
    /// transmit data.
    pub fn with_mute_transmit(mut self) -> Self {
        self.mute_transmit = true;
        self
    }

    /// When set, the device switches to sampling mode without sending its
    /// protocol version.
    pub fn set_mute_sampling(&mut self, mute: bool) {
        self.mute_sampling = mute;
    }

    /// Queues samples which the device streams out while in sampling mode.
    pub fn queue_signal(&mut self, samples: &[u8]) {
        self.signal.extend(samples.iter().copied());
    }

    /// Number of queued signal samples which haven't been read yet.
    pub fn signal_remaining(&self) -> usize {
        self.signal.len()
    }

    /// Everything written to the device so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn clear_written(&mut self) {
        self.written.clear();
        self.data_chunks.clear();
    }

    /// The code bytes the device accepted during the most recent transmit.
    pub fn transmitted(&self) -> &[u8] {
        &self.code
    }

    /// Sizes of the transmit data writes, in order.
    pub fn data_chunks(&self) -> &[usize] {
        &self.data_chunks
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn is_sampling(&self) -> bool {
        self.state == DeviceState::Sampling
    }

    fn reset(&mut self) {
        self.state = DeviceState::Idle;
        self.pending.clear();
    }

    fn command(&mut self, byte: u8) {
        match Command::from_u8(byte) {
            Some(Command::Reset) => self.reset(),
            Some(Command::Version) => {
                let version = self.version;
                self.pending.extend(version.iter().copied());
            }
            Some(Command::Sampling) => {
                self.state = DeviceState::Sampling;
                if !self.mute_sampling {
                    self.pending.extend(PROTOCOL_VERSION.iter().copied());
                }
            }
            Some(Command::TransmitHandshake) | Some(Command::NotifyOnComplete) => {}
            Some(Command::TransmitData) => {
                if self.state == DeviceState::Sampling {
                    self.state = DeviceState::TransmitData;
                    self.code.clear();
                    if !self.mute_transmit {
                        self.pending.push_back(HANDSHAKE);
                    }
                }
            }
            None => {
                if byte == b'R' && self.last_command == b'I' {
                    self.state = DeviceState::Infrared;
                }
            }
        }
        self.last_command = byte;
    }

    fn data(&mut self, bytes: &[u8]) -> usize {
        self.data_chunks.push(bytes.len());
        let accepted = if self.short_data_writes {
            bytes.len() - 1
        } else {
            bytes.len()
        };
        self.code.extend_from_slice(&bytes[..accepted]);
        if self.mute_transmit {
            return accepted;
        }
        self.pending.push_back(self.data_chunks.len() as u8);

        if self.code.len() % 2 == 0 && self.code.ends_with(&END_OF_SIGNAL) {
            info!("mock transmitted {} bytes", self.code.len());
            let count = self.code.len() as u16;
            self.pending.push_back(b't');
            self.pending.push_back((count >> 8) as u8);
            self.pending.push_back((count & 0xff) as u8);
            self.pending.push_back(self.completion_flag);
            self.state = DeviceState::Sampling;
        }
        accepted
    }

    fn next_byte(&mut self) -> Option<u8> {
        if let Some(byte) = self.pending.pop_front() {
            return Some(byte);
        }
        if self.state == DeviceState::Sampling {
            return self.signal.pop_front();
        }
        None
    }
}

impl Channel for MockDevice {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        debug!("mock write {:?}", bytes.hex_dump());
        self.written.extend_from_slice(bytes);
        if self.state == DeviceState::TransmitData {
            if bytes == &RESET_SEQUENCE[..] {
                self.reset();
                return Ok(bytes.len());
            }
            return Ok(self.data(bytes));
        }
        for byte in bytes {
            self.command(*byte);
        }
        Ok(bytes.len())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        for slot in buf.iter_mut() {
            *slot = self.next_byte().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "mock device has nothing to send")
            })?;
        }
        Ok(())
    }

    fn flush_output(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
