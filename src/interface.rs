use crate::config::Config;
use crate::error::ErrorKind;
use crate::traits::{Command, Watchdog};
use core::marker::PhantomData;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Bytes staged on the stack by [`DisplayInterface::data_x_times`]
const REPEAT_CHUNK: usize = 64;

/// The Connection Interface of the panel
///
/// Owns the three discrete lines; the SPI device is lent to every call.
pub(crate) struct DisplayInterface<SPI, BUSY, DC, RST> {
    /// SPI
    _spi: PhantomData<SPI>,
    /// Low for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// busy loop tunables
    config: Config,
}

impl<SPI, BUSY, DC, RST> DisplayInterface<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// The config is expected to be validated already.
    pub fn new(busy: BUSY, dc: DC, rst: RST, config: Config) -> Self {
        DisplayInterface {
            _spi: PhantomData,
            busy,
            dc,
            rst,
            config,
        }
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub(crate) fn cmd<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // low for commands
        self.dc.set_low().map_err(ErrorKind::DcError)?;

        // Transfer the command over spi
        self.write(spi, &[command.address()])
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(
        &mut self,
        spi: &mut SPI,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        self.write(spi, data)
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    pub(crate) fn cmd_with_data<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.cmd(spi, command)?;
        self.data(spi, data)
    }

    /// Basic function for sending the same byte of data (one u8) multiple times over spi
    pub(crate) fn data_x_times(
        &mut self,
        spi: &mut SPI,
        val: u8,
        repetitions: u32,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        let chunk = [val; REPEAT_CHUNK];
        let mut remaining = repetitions as usize;
        while remaining > 0 {
            let n = remaining.min(REPEAT_CHUNK);
            self.write(spi, &chunk[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    // spi write helper/abstraction function
    //
    // `SpiDevice::write` only returns once the transaction is flushed, so the DC line is
    // never switched under an in-flight transfer.
    fn write(&mut self, spi: &mut SPI, data: &[u8]) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                spi.write(data_chunk).map_err(ErrorKind::SpiError)?;
            }
            Ok(())
        } else {
            spi.write(data).map_err(ErrorKind::SpiError)
        }
    }

    /// Waits until device isn't busy anymore
    ///
    /// Feeds the watchdog on the first poll and then every
    /// [`watchdog_feed_interval`](Config::watchdog_feed_interval) polls.
    /// Without a [`busy_timeout_us`](Config::busy_timeout_us) this blocks for as long as
    /// the panel holds the line.
    pub(crate) fn wait_until_idle<DELAY: DelayNs, WD: Watchdog>(
        &mut self,
        delay: &mut DELAY,
        watchdog: &mut WD,
        is_busy_low: bool,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        if !self.is_busy(is_busy_low)? {
            return Ok(());
        }
        debug!("Waiting for busy signal to clear...");

        let feed_interval = self.config.watchdog_feed_interval.max(1);
        let poll_us = self.config.busy_poll_interval_us;
        let mut polls: u32 = 0;
        let mut waited_us: u32 = 0;

        while self.is_busy(is_busy_low)? {
            if polls % feed_interval == 0 {
                watchdog.feed();
            }
            polls = polls.wrapping_add(1);

            if let Some(timeout_us) = self.config.busy_timeout_us {
                if waited_us >= timeout_us {
                    warn!("Busy signal still set after {} us", waited_us);
                    return Err(ErrorKind::BusyTimeout);
                }
            }

            if poll_us > 0 {
                delay.delay_us(poll_us);
                waited_us = waited_us.saturating_add(poll_us);
            }
        }

        debug!("Busy signal cleared");
        Ok(())
    }

    /// Checks if device is still busy
    ///
    /// is_busy_low
    ///
    ///  - TRUE when the panel pulls the line low while working (epd1in54b)
    ///  - FALSE when it drives it high
    pub(crate) fn is_busy(
        &mut self,
        is_busy_low: bool,
    ) -> Result<bool, ErrorKind<SPI, BUSY, DC, RST>> {
        if is_busy_low {
            self.busy.is_low()
        } else {
            self.busy.is_high()
        }
        .map_err(ErrorKind::BusyError)
    }

    /// Resets the device.
    ///
    /// Pulls the reset line low for `duration_ms`, then holds it high for the same time
    /// before the controller accepts commands.
    pub(crate) fn reset<DELAY: DelayNs>(
        &mut self,
        delay: &mut DELAY,
        duration_ms: u32,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.rst.set_low().map_err(ErrorKind::RstError)?;
        delay.delay_ms(duration_ms);
        self.rst.set_high().map_err(ErrorKind::RstError)?;
        delay.delay_ms(duration_ms);
        Ok(())
    }

    /// Gives back the owned lines
    pub(crate) fn release(self) -> (BUSY, DC, RST) {
        (self.busy, self.dc, self.rst)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::traits::NoWatchdog;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[derive(Clone, Copy)]
    struct Opcode(u8);

    impl Command for Opcode {
        fn address(self) -> u8 {
            self.0
        }
    }

    fn spi_write(bytes: &[u8]) -> Vec<SpiTransaction<u8>> {
        vec![
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(bytes.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    #[test]
    fn command_then_data_toggles_dc() {
        let mut expectations = spi_write(&[0x61]);
        expectations.extend(spi_write(&[0xC8, 0x00, 0xC8]));
        let mut spi = SpiMock::new(&expectations);

        let mut dc = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut busy = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut interface =
            DisplayInterface::new(busy.clone(), dc.clone(), rst.clone(), Config::default());
        interface
            .cmd_with_data(&mut spi, Opcode(0x61), &[0xC8, 0x00, 0xC8])
            .unwrap();

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }

    #[test]
    fn data_x_times_is_split_into_chunks() {
        let mut expectations = spi_write(&[0xFF; REPEAT_CHUNK]);
        expectations.extend(spi_write(&[0xFF; 6]));
        let mut spi = SpiMock::new(&expectations);

        let mut dc = PinMock::new(&[PinTransaction::set(State::High)]);
        let mut busy = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut interface =
            DisplayInterface::new(busy.clone(), dc.clone(), rst.clone(), Config::default());
        interface
            .data_x_times(&mut spi, 0xFF, REPEAT_CHUNK as u32 + 6)
            .unwrap();

        spi.done();
        dc.done();
        busy.done();
        rst.done();
    }

    #[test]
    fn reset_pulses_low_then_high() {
        let mut rst = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut busy = PinMock::new(&[]);
        let mut dc = PinMock::new(&[]);

        let mut interface: DisplayInterface<SpiMock<u8>, _, _, _> =
            DisplayInterface::new(busy.clone(), dc.clone(), rst.clone(), Config::default());
        interface.reset(&mut NoopDelay::new(), 200).unwrap();

        rst.done();
        busy.done();
        dc.done();
    }

    #[test]
    fn busy_is_active_low() {
        let mut busy = PinMock::new(&[
            PinTransaction::get(State::Low),
            PinTransaction::get(State::High),
        ]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut interface: DisplayInterface<SpiMock<u8>, _, _, _> =
            DisplayInterface::new(busy.clone(), dc.clone(), rst.clone(), Config::default());
        assert!(interface.is_busy(true).unwrap());
        assert!(!interface.is_busy(true).unwrap());

        busy.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn idle_panel_returns_without_feeding() {
        let mut busy = PinMock::new(&[PinTransaction::get(State::High)]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let mut interface: DisplayInterface<SpiMock<u8>, _, _, _> =
            DisplayInterface::new(busy.clone(), dc.clone(), rst.clone(), Config::default());

        let mut feeds = 0;
        let mut watchdog = || feeds += 1;
        interface
            .wait_until_idle(&mut NoopDelay::new(), &mut watchdog, true)
            .unwrap();
        assert_eq!(feeds, 0);

        busy.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn watchdog_is_fed_while_busy() {
        // entry check, then 5 busy polls, then idle
        let mut transactions = vec![PinTransaction::get(State::Low); 6];
        transactions.push(PinTransaction::get(State::High));
        let mut busy = PinMock::new(&transactions);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let config = Config::default().with_watchdog_feed_interval(2);
        let mut interface: DisplayInterface<SpiMock<u8>, _, _, _> =
            DisplayInterface::new(busy.clone(), dc.clone(), rst.clone(), config);

        let mut feeds = 0;
        let mut watchdog = || feeds += 1;
        interface
            .wait_until_idle(&mut NoopDelay::new(), &mut watchdog, true)
            .unwrap();
        // polls 0, 2 and 4
        assert_eq!(feeds, 3);

        busy.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn optional_timeout_reports_unresponsive_panel() {
        // entry check plus four polls: 0, 1000, 2000 and 3000 us waited
        let transactions = vec![PinTransaction::get(State::Low); 5];
        let mut busy = PinMock::new(&transactions);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let config = Config::default()
            .with_busy_poll_interval_us(1_000)
            .with_busy_timeout_us(Some(3_000));
        let mut interface: DisplayInterface<SpiMock<u8>, _, _, _> =
            DisplayInterface::new(busy.clone(), dc.clone(), rst.clone(), config);

        let result = interface.wait_until_idle(&mut NoopDelay::new(), &mut NoWatchdog, true);
        assert!(result.unwrap_err().is_timeout());

        busy.done();
        dc.done();
        rst.done();
    }
}
