use core::fmt::Debug;

use crate::config::PinDescriptor;

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Liveness signal for a supervisory timer
///
/// Long blocking waits (the panel redraw takes hundreds of milliseconds up to seconds)
/// call [`feed`](Watchdog::feed) at a bounded interval so the host is not reset while
/// the driver is polling the busy line.
///
/// Any `FnMut()` closure is a watchdog:
///
///```rust
///use epd_ws154b::prelude::*;
///
///let mut fed = 0;
///let mut watchdog = || fed += 1;
///watchdog.feed();
///# drop(watchdog);
///assert_eq!(fed, 1);
///```
pub trait Watchdog {
    /// Reset the supervisory timeout counter
    fn feed(&mut self);
}

impl<F: FnMut()> Watchdog for F {
    fn feed(&mut self) {
        self()
    }
}

/// Watchdog for hosts without a supervisory timer
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWatchdog;

impl Watchdog for NoWatchdog {
    fn feed(&mut self) {}
}

/// What a GPIO line is used for on the panel connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    /// Data/Command select, output (low for command, high for data)
    DataCommand,
    /// Reset, output (active low)
    Reset,
    /// Busy signal from the panel, input (low while busy)
    Busy,
}

impl PinRole {
    /// Whether the line has to be configured as an input
    pub fn is_input(self) -> bool {
        matches!(self, PinRole::Busy)
    }
}

/// Board specific pin multiplexing and bus bring-up
///
/// The driver never touches controller registers itself. [`Device::init`](crate::Device::init)
/// hands every [`PinDescriptor`] to this capability once, then asks it to bring up the
/// SPI peripheral (mode 0, MSB first, see [`SPI_MODE`](crate::SPI_MODE)).
pub trait BoardSetup {
    /// Error reported by the board
    type Error: Debug;

    /// Route `pin` to its GPIO function and set its direction according to `role`
    fn configure_pin(&mut self, pin: &PinDescriptor, role: PinRole) -> Result<(), Self::Error>;

    /// Configure the SPI peripheral the panel is attached to
    fn configure_bus(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_watchdog_is_fed() {
        let mut count = 0u32;
        {
            let mut wd = || count += 1;
            wd.feed();
            wd.feed();
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn only_busy_is_input() {
        assert!(PinRole::Busy.is_input());
        assert!(!PinRole::DataCommand.is_input());
        assert!(!PinRole::Reset.is_input());
    }
}
