//! A simple Driver for the Waveshare 1.54" (B) E-Ink Display via SPI
//!
//! More information on this display can be found at the [Waveshare Wiki](https://www.waveshare.com/wiki/1.54inch_e-Paper_Module_(B))
//!
//! The controller forgets its configuration in sleep, so every frame runs the whole
//! cycle: reset, init, transmit black, transmit red, refresh, wait, sleep.
//!
//!```rust, no_run
//!# use embedded_hal_mock::eh1::*;
//!use epd_ws154b::{epd1in54b::*, prelude::*};
//!#
//!# let expectations = [];
//!# let mut spi = spi::Mock::new(&expectations);
//!# let expectations = [];
//!# let busy_in = digital::Mock::new(&expectations);
//!# let dc = digital::Mock::new(&expectations);
//!# let rst = digital::Mock::new(&expectations);
//!# let mut delay = delay::NoopDelay::new();
//!
//!let mut epd = Epd1in54b::new(busy_in, dc, rst, Config::default()).unwrap();
//!let frame = FrameBuffers::filled(TriColor::White);
//!
//!epd.wake_up(&mut spi, &mut delay, &mut NoWatchdog).unwrap();
//!epd.transmit(&mut spi, &mut delay, &mut NoWatchdog, frame.black(), frame.red()).unwrap();
//!epd.finish_update(&mut spi, &mut delay, &mut NoWatchdog).unwrap();
//!```

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::config::{Config, ConfigError};
use crate::error::ErrorKind;
use crate::interface::DisplayInterface;
use crate::traits::Watchdog;

//The Lookup Tables for the Display
mod constants;
use self::constants::*;

pub(crate) mod command;
use self::command::Command;

pub mod transcode;
use self::transcode::{expand_into, EXPAND_CHUNK};

/// Width of epd1in54b in pixels
pub const WIDTH: u32 = 200;
/// Height of epd1in54b in pixels
pub const HEIGHT: u32 = 200;
/// Bytes per plane, one bit per pixel
pub const BUFFER_SIZE: usize = WIDTH as usize * HEIGHT as usize / 8;
/// Bytes sent on transmission 1 after bit doubling
pub const BLACK_WIRE_SIZE: usize = 2 * BUFFER_SIZE;

const IS_BUSY_LOW: bool = true;

/// Reset line hold, low and high
const RESET_HOLD_MS: u32 = 200;
/// Minimum settle time around the plane transmissions
const SETTLE_DELAY_US: u32 = 2_000;
/// The sleep sequence waits this many times for `SLEEP_SETTLE_MS`
const SLEEP_SETTLE_STEPS: u32 = 3;
const SLEEP_SETTLE_MS: u32 = 500;

/// Where the panel is in its update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Nothing sent since power up
    Uninitialized,
    /// Reset line is being pulsed
    Resetting,
    /// Power, panel and LUT configuration in progress
    Initializing,
    /// Configured and accepting frame data
    Ready,
    /// Sending the black plane on transmission 1
    TransmittingBlack,
    /// Sending the red plane on transmission 2
    TransmittingRed,
    /// Refresh command issued
    Refreshing,
    /// Waiting for the redraw to finish
    WaitingBusy,
    /// Powered off after a finished update
    ///
    /// The controller lost its configuration. The state stays here until the next
    /// [`wake_up`](Epd1in54b::wake_up), which resets and re-initializes the panel and
    /// leaves it [`Ready`](PanelState::Ready).
    Sleeping,
}

/// Epd1in54b driver
pub struct Epd1in54b<SPI, BUSY, DC, RST> {
    interface: DisplayInterface<SPI, BUSY, DC, RST>,
    state: PanelState,
}

impl<SPI, BUSY, DC, RST> Epd1in54b<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Creates the driver without touching the hardware
    ///
    /// The panel is brought up by [`wake_up`](Epd1in54b::wake_up).
    pub fn new(busy: BUSY, dc: DC, rst: RST, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let interface = DisplayInterface::new(busy, dc, rst, config);

        Ok(Epd1in54b {
            interface,
            state: PanelState::Uninitialized,
        })
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn width(&self) -> u32 {
        WIDTH
    }

    pub fn height(&self) -> u32 {
        HEIGHT
    }

    /// Pulses the reset line, always the first step of a wake up
    pub fn reset<DELAY: DelayNs>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        debug!("Resetting WS154B...");
        self.state = PanelState::Resetting;
        self.interface.reset(delay, RESET_HOLD_MS)?;
        debug!("Done.");
        Ok(())
    }

    /// Resets the controller and sends the whole configuration
    ///
    /// The order of the init commands is mandated by the controller firmware.
    pub fn wake_up<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.reset(delay)?;

        debug!("Waking device...");
        self.state = PanelState::Initializing;

        trace!("Setting power settings");
        self.interface
            .cmd_with_data(spi, Command::PowerSetting, &[0x07, 0x00, 0x08, 0x00])?;

        trace!("Setting booster soft start");
        self.interface
            .cmd_with_data(spi, Command::BoosterSoftStart, &[0x07, 0x07, 0x07])?;

        trace!("Sending power on command");
        self.command(spi, Command::PowerOn)?;
        self.wait_until_idle(delay, watchdog)?;

        trace!("Setting panel settings");
        self.cmd_with_data(spi, Command::PanelSetting, &[0xCF])?;

        trace!("Setting VCOM data interval");
        self.cmd_with_data(spi, Command::VcomAndDataIntervalSetting, &[0x37])?;

        trace!("Setting PLL control");
        self.cmd_with_data(spi, Command::PllControl, &[0x39])?;

        trace!("Setting TCON resolution");
        self.send_resolution(spi)?;

        trace!("Setting VCM DC settings");
        self.cmd_with_data(spi, Command::VcmDcSetting, &[0x0E])?;

        self.set_lut(spi)?;

        self.state = PanelState::Ready;
        debug!("Finished initialisation");
        Ok(())
    }

    /// Sends both planes, the black one bit doubled
    pub fn transmit<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
        black: &[u8; BUFFER_SIZE],
        red: &[u8; BUFFER_SIZE],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        debug!("Sending black data...");
        self.start_transmission(spi, delay, watchdog)?;

        let mut wire = [0u8; 2 * EXPAND_CHUNK];
        for chunk in black.chunks(EXPAND_CHUNK) {
            let n = expand_into(chunk, &mut wire);
            self.send_data(spi, &wire[..n])?;
        }
        debug!("Sent black data");

        self.switch_to_red(spi, delay)?;
        debug!("Sending red data...");
        self.send_data(spi, red)?;
        debug!("Sent red data");
        Ok(())
    }

    /// Sends white to both planes without looking at any framebuffer
    pub fn transmit_blank<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.start_transmission(spi, delay, watchdog)?;
        self.interface
            .data_x_times(spi, 0xFF, BLACK_WIRE_SIZE as u32)?;

        self.switch_to_red(spi, delay)?;
        self.interface.data_x_times(spi, 0xFF, BUFFER_SIZE as u32)
    }

    /// Waits for the panel and tells it to redraw from its SRAM
    pub fn refresh<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        debug!("Refreshing screen");
        self.wait_until_idle(delay, watchdog)?;
        self.command(spi, Command::DisplayRefresh)?;
        self.state = PanelState::Refreshing;
        Ok(())
    }

    /// Refresh, wait for the redraw and power the panel down
    pub fn finish_update<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        delay.delay_us(SETTLE_DELAY_US);
        self.refresh(spi, delay, watchdog)?;

        self.state = PanelState::WaitingBusy;
        self.wait_until_idle(delay, watchdog)?;

        self.sleep(spi, delay, watchdog)
    }

    /// Powers the panel down
    ///
    /// Border floating, VCOM to 0V and the gate/source voltages off, then a 1.5s
    /// settle before power off.
    pub fn sleep<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        debug!("Starting sleep mode...");
        self.cmd_with_data(spi, Command::VcomAndDataIntervalSetting, &[0x17])?;
        self.cmd_with_data(spi, Command::VcmDcSetting, &[0x00])?;
        self.cmd_with_data(spi, Command::PowerSetting, &[0x02, 0x00, 0x00, 0x00])?;

        debug!("Waiting for the device to settle...");
        for _ in 0..SLEEP_SETTLE_STEPS {
            watchdog.feed();
            delay.delay_ms(SLEEP_SETTLE_MS);
        }

        self.command(spi, Command::PowerOff)?;
        self.state = PanelState::Sleeping;
        debug!("Sent sleep command");
        Ok(())
    }

    /// Wait until the display has stopped processing data
    pub fn wait_until_idle<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface.wait_until_idle(delay, watchdog, IS_BUSY_LOW)
    }

    /// Reads the busy line, true while the panel pulls it low
    pub fn is_busy(&mut self) -> Result<bool, ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface.is_busy(IS_BUSY_LOW)
    }

    /// Gives back the busy, dc and rst lines
    pub fn release(self) -> (BUSY, DC, RST) {
        self.interface.release()
    }

    fn start_transmission<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        watchdog: &mut WD,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.wait_until_idle(delay, watchdog)?;
        self.command(spi, Command::DataStartTransmission1)?;
        self.state = PanelState::TransmittingBlack;
        delay.delay_us(SETTLE_DELAY_US);
        Ok(())
    }

    fn switch_to_red<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        delay.delay_us(SETTLE_DELAY_US);
        self.command(spi, Command::DataStartTransmission2)?;
        self.state = PanelState::TransmittingRed;
        delay.delay_us(SETTLE_DELAY_US);
        Ok(())
    }

    fn set_lut(&mut self, spi: &mut SPI) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.cmd_with_data(spi, Command::LutForVcom, LUT_VCOM0)?;
        self.cmd_with_data(spi, Command::LutWhiteToWhite, LUT_WHITE_TO_WHITE)?;
        self.cmd_with_data(spi, Command::LutBlackToWhite, LUT_BLACK_TO_WHITE)?;
        self.cmd_with_data(spi, Command::LutG1, LUT_G1)?;
        self.cmd_with_data(spi, Command::LutG2, LUT_G2)?;
        self.cmd_with_data(spi, Command::LutRedVcom, LUT_RED_VCOM)?;
        self.cmd_with_data(spi, Command::LutRed0, LUT_RED0)?;
        self.cmd_with_data(spi, Command::LutRed1, LUT_RED1)
    }

    fn command(
        &mut self,
        spi: &mut SPI,
        command: Command,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface.cmd(spi, command)
    }

    fn send_data(
        &mut self,
        spi: &mut SPI,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface.data(spi, data)
    }

    fn cmd_with_data(
        &mut self,
        spi: &mut SPI,
        command: Command,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface.cmd_with_data(spi, command, data)
    }

    fn send_resolution(&mut self, spi: &mut SPI) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        let w = self.width();
        let h = self.height();

        self.command(spi, Command::TconResolution)?;
        self.send_data(spi, &[w as u8, (h >> 8) as u8, h as u8])
    }
}
