//! The panel together with its framebuffers
//!
//! [`Device`] is what an application keeps around: it owns the panel driver, the black
//! and red plane and a dirty flag telling whether the planes changed since the panel
//! last showed them.
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
//!let pins = Pins {
//!    dc: PinDescriptor::new(0x6000_0834, 0, 0),
//!    rst: PinDescriptor::new(0x6000_0838, 2, 0),
//!    busy: PinDescriptor::new(0x6000_083C, 4, 0),
//!};
//!let mut device = Device::new(busy_in, dc, rst, pins, Config::default()).unwrap();
//!
//!device.frames_mut().set_pixel(10, 10, TriColor::Red);
//!
//!// e.g. from a periodic timer
//!device.update_if_dirty(&mut spi, &mut delay, &mut NoWatchdog).unwrap();
//!```

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::buffer::FrameBuffers;
use crate::config::{Config, ConfigError, Pins};
use crate::epd1in54b::{Epd1in54b, PanelState};
use crate::error::{ErrorKind, InitError};
use crate::traits::{BoardSetup, PinRole, Watchdog};

/// One panel, its two planes and the dirty flag
///
/// The device is not shared: `&mut` access to the framebuffers can't overlap with an
/// update, which is all the coordination the dirty flag needs.
pub struct Device<SPI, BUSY, DC, RST> {
    epd: Epd1in54b<SPI, BUSY, DC, RST>,
    pins: Pins,
    buffers: FrameBuffers,
    dirty: bool,
}

impl<SPI, BUSY, DC, RST> Device<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Device with zeroed framebuffers, marked dirty
    pub fn new(
        busy: BUSY,
        dc: DC,
        rst: RST,
        pins: Pins,
        config: Config,
    ) -> Result<Self, ConfigError> {
        Self::with_buffers(busy, dc, rst, pins, config, FrameBuffers::new())
    }

    /// Device with caller seeded framebuffers, marked dirty
    pub fn with_buffers(
        busy: BUSY,
        dc: DC,
        rst: RST,
        pins: Pins,
        config: Config,
        buffers: FrameBuffers,
    ) -> Result<Self, ConfigError> {
        let epd = Epd1in54b::new(busy, dc, rst, config)?;
        Ok(Device {
            epd,
            pins,
            buffers,
            dirty: true,
        })
    }

    /// Configures pins and bus through `board`, then shows the framebuffers
    pub fn init<B, DELAY, WD>(
        &mut self,
        board: &mut B,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), InitError<B::Error, SPI, BUSY, DC, RST>>
    where
        B: BoardSetup,
        DELAY: DelayNs,
        WD: Watchdog,
    {
        for (pin, role) in [
            (&self.pins.dc, PinRole::DataCommand),
            (&self.pins.rst, PinRole::Reset),
            (&self.pins.busy, PinRole::Busy),
        ] {
            board.configure_pin(pin, role).map_err(InitError::Setup)?;
        }
        board.configure_bus().map_err(InitError::Setup)?;

        self.update(spi, delay, watchdog)?;
        Ok(())
    }

    /// Full cycle: wake, transmit both planes, refresh, wait, sleep
    ///
    /// Always sends the whole frame, whether dirty or not. Clears the dirty flag once the
    /// panel went to sleep.
    pub fn update<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.epd.wake_up(spi, delay, watchdog)?;
        self.epd
            .transmit(spi, delay, watchdog, self.buffers.black(), self.buffers.red())?;
        self.epd.finish_update(spi, delay, watchdog)?;
        self.dirty = false;
        Ok(())
    }

    /// Runs [`update`](Device::update) only if the framebuffers changed
    ///
    /// Returns whether an update ran.
    pub fn update_if_dirty<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<bool, ErrorKind<SPI, BUSY, DC, RST>> {
        if !self.dirty {
            return Ok(false);
        }
        self.update(spi, delay, watchdog)?;
        Ok(true)
    }

    /// Redraws from the panel SRAM without sending the framebuffers
    pub fn refresh<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.epd.refresh(spi, delay, watchdog)
    }

    /// Whites out the panel, the framebuffers are left alone
    ///
    /// Counts as a finished update: the dirty flag is cleared, so a following
    /// [`update_if_dirty`](Device::update_if_dirty) keeps the blank panel until the
    /// framebuffers change again.
    pub fn blank_screen<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        debug!("Blanking screen");
        self.epd.wake_up(spi, delay, watchdog)?;
        self.epd.transmit_blank(spi, delay, watchdog)?;
        self.epd.finish_update(spi, delay, watchdog)?;
        self.dirty = false;
        Ok(())
    }

    /// True while the panel holds its busy line low
    pub fn busy(&mut self) -> Result<bool, ErrorKind<SPI, BUSY, DC, RST>> {
        self.epd.is_busy()
    }

    pub fn frames(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Mutable framebuffers, marks the device dirty
    pub fn frames_mut(&mut self) -> &mut FrameBuffers {
        self.dirty = true;
        &mut self.buffers
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> PanelState {
        self.epd.state()
    }

    pub fn pins(&self) -> &Pins {
        &self.pins
    }

    /// Gives back the busy, dc and rst lines
    pub fn release(self) -> (BUSY, DC, RST) {
        self.epd.release()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;
    use crate::config::PinDescriptor;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh1::spi::Mock as SpiMock;

    fn pins() -> Pins {
        Pins {
            dc: PinDescriptor::new(0x34, 0, 0),
            rst: PinDescriptor::new(0x38, 2, 0),
            busy: PinDescriptor::new(0x40, 4, 0),
        }
    }

    #[test]
    fn starts_dirty_with_zeroed_buffers() {
        let mut busy = PinMock::new(&[]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut device = Device::<SpiMock<u8>, _, _, _>::new(
            busy.clone(),
            dc.clone(),
            rst.clone(),
            pins(),
            Config::default(),
        )
        .unwrap();
        assert!(device.is_dirty());
        assert_eq!(device.state(), PanelState::Uninitialized);
        assert!(device.frames().black().iter().all(|b| *b == 0));
        assert!(device.frames().red().iter().all(|b| *b == 0));

        device.dirty = false;
        device.frames_mut().black_mut()[0] = 0xFF;
        assert!(device.is_dirty());

        busy.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn busy_is_inverted_pin_level() {
        let mut busy = PinMock::new(&[
            PinTransaction::get(State::Low),
            PinTransaction::get(State::High),
        ]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut device = Device::<SpiMock<u8>, _, _, _>::new(
            busy.clone(),
            dc.clone(),
            rst.clone(),
            pins(),
            Config::default(),
        )
        .unwrap();
        assert!(device.busy().unwrap());
        assert!(!device.busy().unwrap());

        busy.done();
        dc.done();
        rst.done();
    }

    struct FailingBoard {
        configured: Vec<PinRole>,
    }

    impl BoardSetup for FailingBoard {
        type Error = &'static str;

        fn configure_pin(
            &mut self,
            _pin: &PinDescriptor,
            role: PinRole,
        ) -> Result<(), Self::Error> {
            self.configured.push(role);
            Ok(())
        }

        fn configure_bus(&mut self) -> Result<(), Self::Error> {
            Err("no spi")
        }
    }

    #[test]
    fn init_stops_on_board_error() {
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut busy = PinMock::new(&[]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut device =
            Device::new(busy.clone(), dc.clone(), rst.clone(), pins(), Config::default()).unwrap();
        let mut board = FailingBoard {
            configured: Vec::new(),
        };

        let result = device.init(
            &mut board,
            &mut spi,
            &mut embedded_hal_mock::eh1::delay::NoopDelay::new(),
            &mut crate::traits::NoWatchdog,
        );
        assert!(matches!(result, Err(InitError::Setup("no spi"))));
        assert_eq!(
            board.configured,
            [PinRole::DataCommand, PinRole::Reset, PinRole::Busy]
        );
        assert!(device.is_dirty());

        spi.done();
        busy.done();
        dc.done();
        rst.done();
    }
}
