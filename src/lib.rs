//! A simple Driver for the Waveshare 1.54" (B) black/red E-Ink Display via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 10Mhz is what the panel was run with on an ESP8266
//!
//! ### Other....
//!
//! - Buffersize: both planes are always `WIDTH / 8 * HEIGHT` = 5000 bytes
//! - The busy line is low while the panel is working. Waiting on it feeds the
//!   [`Watchdog`](traits::Watchdog) and, unless a timeout is configured, never gives up.
//!
//! # Examples
//!
//!```rust, no_run
//!# use embedded_hal_mock::eh1::*;
//!use epd_ws154b::prelude::*;
//!#
//!# let expectations = [];
//!# let mut spi = spi::Mock::new(&expectations);
//!# let expectations = [];
//!# let busy_in = digital::Mock::new(&expectations);
//!# let dc = digital::Mock::new(&expectations);
//!# let rst = digital::Mock::new(&expectations);
//!# let mut delay = delay::NoopDelay::new();
//!# struct Board;
//!# impl BoardSetup for Board {
//!#     type Error = ();
//!#     fn configure_pin(&mut self, _: &PinDescriptor, _: PinRole) -> Result<(), ()> { Ok(()) }
//!#     fn configure_bus(&mut self) -> Result<(), ()> { Ok(()) }
//!# }
//!# let mut board = Board;
//!# let pins = Pins {
//!#     dc: PinDescriptor::new(0, 0, 0),
//!#     rst: PinDescriptor::new(0, 2, 0),
//!#     busy: PinDescriptor::new(0, 4, 0),
//!# };
//!let mut device = Device::new(busy_in, dc, rst, pins, Config::default()).unwrap();
//!
//!// configure pins and bus, then show the (zeroed) framebuffers
//!device.init(&mut board, &mut spi, &mut delay, &mut NoWatchdog).unwrap();
//!
//!// draw something into the buffers
//!device.frames_mut().clear(TriColor::White);
//!device.frames_mut().set_pixel(100, 100, TriColor::Red);
//!
//!// full cycle: wake, transmit, refresh, wait, sleep
//!device.update(&mut spi, &mut delay, &mut NoWatchdog).unwrap();
//!
//!// white out the panel, the buffers stay as they are
//!device.blank_screen(&mut spi, &mut delay, &mut NoWatchdog).unwrap();
//!```
//!
#![no_std]

#[macro_use]
mod fmt;

pub mod buffer;
pub mod color;
pub mod config;
pub mod device;
pub mod epd1in54b;
pub mod error;
pub mod traits;

/// Interface for the physical connection between display and the controlling device
mod interface;

pub use crate::device::Device;

pub mod prelude {
    pub use crate::buffer::FrameBuffers;
    pub use crate::color::TriColor;
    pub use crate::config::{Config, PinDescriptor, Pins};
    pub use crate::device::Device;
    pub use crate::epd1in54b::PanelState;
    pub use crate::error::{ErrorKind, InitError};
    pub use crate::traits::{BoardSetup, NoWatchdog, PinRole, Watchdog};
    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
