//! Driver configuration and pin assignment

use core::fmt;

/// Identifies a GPIO line on the host controller
///
/// The values are opaque to the driver and only handed to the
/// [`BoardSetup`](crate::traits::BoardSetup) capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDescriptor {
    /// Multiplexer register of the pin, e.g. the IO_MUX address on an ESP8266
    pub periph: u32,
    /// Pin number
    pub num: u8,
    /// Alternate function selector routing the pad to GPIO
    pub func: u8,
}

impl PinDescriptor {
    pub const fn new(periph: u32, num: u8, func: u8) -> Self {
        PinDescriptor { periph, num, func }
    }
}

/// The three discrete lines of the panel connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pins {
    /// Data/Command select
    pub dc: PinDescriptor,
    /// Reset
    pub rst: PinDescriptor,
    /// Busy input
    pub busy: PinDescriptor,
}

/// Rejected [`Config`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The watchdog must be fed at least every `n >= 1` polls
    ZeroWatchdogInterval,
    /// A busy timeout is measured in poll intervals and needs a non-zero interval
    TimeoutWithoutPollInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWatchdogInterval => {
                write!(f, "watchdog feed interval must be at least one poll")
            }
            ConfigError::TimeoutWithoutPollInterval => {
                write!(f, "busy timeout requires a non-zero poll interval")
            }
        }
    }
}

/// Tunables of the busy wait loop
///
/// Protocol timings (reset pulse, settle delays, sleep hold) are fixed by the panel and
/// not part of the configuration.
///
///```rust
///use epd_ws154b::config::Config;
///
///let config = Config::default()
///    .with_busy_poll_interval_us(500)
///    .with_busy_timeout_us(Some(5_000_000));
///assert!(config.validate().is_ok());
///```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Microseconds to sleep between two reads of the busy line, 0 spins
    pub busy_poll_interval_us: u32,
    /// The watchdog is fed on the first poll and then every this many polls
    pub watchdog_feed_interval: u32,
    /// Give up waiting for the panel after this long.
    ///
    /// `None` waits forever: a panel that never releases busy can't be told apart
    /// from a slow one.
    pub busy_timeout_us: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            busy_poll_interval_us: 1_000,
            watchdog_feed_interval: 64,
            busy_timeout_us: None,
        }
    }
}

impl Config {
    pub fn with_busy_poll_interval_us(mut self, us: u32) -> Self {
        self.busy_poll_interval_us = us;
        self
    }

    pub fn with_watchdog_feed_interval(mut self, polls: u32) -> Self {
        self.watchdog_feed_interval = polls;
        self
    }

    pub fn with_busy_timeout_us(mut self, timeout: Option<u32>) -> Self {
        self.busy_timeout_us = timeout;
        self
    }

    /// Check the combination of values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watchdog_feed_interval == 0 {
            return Err(ConfigError::ZeroWatchdogInterval);
        }
        if self.busy_timeout_us.is_some() && self.busy_poll_interval_us == 0 {
            return Err(ConfigError::TimeoutWithoutPollInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waits_forever() {
        let config = Config::default();
        assert_eq!(config.busy_timeout_us, None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_feed_interval() {
        let config = Config::default().with_watchdog_feed_interval(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroWatchdogInterval));
    }

    #[test]
    fn timeout_needs_poll_interval() {
        let config = Config::default()
            .with_busy_poll_interval_us(0)
            .with_busy_timeout_us(Some(1_000));
        assert_eq!(
            config.validate(),
            Err(ConfigError::TimeoutWithoutPollInterval)
        );

        // spinning without a timeout is fine
        let config = config.with_busy_timeout_us(None);
        assert_eq!(config.validate(), Ok(()));
    }
}
