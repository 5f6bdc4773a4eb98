use std::time::Duration;

/// Pause inserted around mode changes and protocol steps so the device's
/// firmware can keep up.
pub const DEFAULT_SETTLE_TIME: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How long to pause between protocol steps. Zero disables pausing.
    pub settle_time: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_time: DEFAULT_SETTLE_TIME,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Default::default()
    }

    /// A configuration which never pauses, for use with simulated devices.
    pub fn no_delay() -> Self {
        Self {
            settle_time: Duration::from_millis(0),
        }
    }

    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }
}
