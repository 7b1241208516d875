use core::fmt::{Debug, Display, Formatter};

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

/// Epd error type
pub enum ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Encountered an SPI error
    SpiError(SPI::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// The panel kept the busy line asserted past the configured timeout
    ///
    /// Only reported when [`Config::busy_timeout_us`](crate::config::Config::busy_timeout_us) is set.
    BusyTimeout,
}

impl<SPI, BUSY, DC, RST> Display for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "SPI error: {err:?}"),
            Self::BusyError(err) => write!(f, "Busy pin error: {err:?}"),
            Self::DcError(err) => write!(f, "DC pin error: {err:?}"),
            Self::RstError(err) => write!(f, "RST pin error: {err:?}"),
            Self::BusyTimeout => write!(f, "Panel unresponsive: busy line never released"),
        }
    }
}

impl<SPI, BUSY, DC, RST> Debug for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::BusyTimeout => write!(f, "BusyTimeout"),
        }
    }
}

impl<SPI, BUSY, DC, RST> core::error::Error for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
}

impl<SPI, BUSY, DC, RST> ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// True for [`ErrorKind::BusyTimeout`]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::BusyTimeout)
    }
}

/// Error of [`Device::init`](crate::Device::init)
pub enum InitError<S, SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// The board failed to configure a pin or the bus
    Setup(S),
    /// The first update of the panel failed
    Panel(ErrorKind<SPI, BUSY, DC, RST>),
}

impl<S, SPI, BUSY, DC, RST> From<ErrorKind<SPI, BUSY, DC, RST>> for InitError<S, SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn from(err: ErrorKind<SPI, BUSY, DC, RST>) -> Self {
        InitError::Panel(err)
    }
}

impl<S, SPI, BUSY, DC, RST> Debug for InitError<S, SPI, BUSY, DC, RST>
where
    S: Debug,
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Setup(err) => f.debug_tuple("Setup").field(err).finish(),
            Self::Panel(err) => f.debug_tuple("Panel").field(err).finish(),
        }
    }
}

impl<S, SPI, BUSY, DC, RST> Display for InitError<S, SPI, BUSY, DC, RST>
where
    S: Debug,
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Setup(err) => write!(f, "Board setup failed: {err:?}"),
            Self::Panel(err) => Display::fmt(err, f),
        }
    }
}

impl<S, SPI, BUSY, DC, RST> core::error::Error for InitError<S, SPI, BUSY, DC, RST>
where
    S: Debug,
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
}
