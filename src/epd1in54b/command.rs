//! SPI Commands for the Waveshare 1.54" (B) black/red E-Ink Display
use crate::traits;

/// Epd1in54b commands
///
/// Should rarely (never?) be needed directly.
///
/// The opcodes are fixed by the panel controller firmware.
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Panel Setting
    ///     1 Databyte: resolution, LUT source, scan direction, booster, soft reset
    PanelSetting = 0x00,
    /// Power Setting
    ///     4 Databytes: source/gate power selection and voltage levels
    PowerSetting = 0x01,
    /// Power OFF, turns off booster, regulators and source/gate drivers
    PowerOff = 0x02,
    PowerOffSequenceSetting = 0x03,
    /// Power ON, the busy line is asserted until the booster is up
    PowerOn = 0x04,
    PowerOnMeasure = 0x05,
    /// Booster Soft Start
    ///     3 Databytes: soft start period for phase A, B and C
    BoosterSoftStart = 0x06,
    DeepSleep = 0x07,
    /// Starts the black/white transmission, 2 bits per pixel on this panel
    DataStartTransmission1 = 0x10,
    DataStop = 0x11,
    /// Redraw the panel from its internal SRAM
    DisplayRefresh = 0x12,
    /// Starts the red transmission, 1 bit per pixel
    DataStartTransmission2 = 0x13,

    LutForVcom = 0x20,
    LutWhiteToWhite = 0x21,
    LutBlackToWhite = 0x22,
    LutG1 = 0x23,
    LutG2 = 0x24,
    LutRedVcom = 0x25,
    LutRed0 = 0x26,
    LutRed1 = 0x27,

    PllControl = 0x30,
    TemperatureSensorCommand = 0x40,
    TemperatureSensorCalibration = 0x41,
    TemperatureSensorWrite = 0x42,
    TemperatureSensorRead = 0x43,
    /// VCOM and data interval
    ///     1 Databyte: border output and data polarity
    VcomAndDataIntervalSetting = 0x50,
    LowPowerDetection = 0x51,
    TconSetting = 0x60,
    /// TCON Resolution
    ///     3 Databytes: horizontal resolution, vertical resolution high, vertical resolution low
    TconResolution = 0x61,
    SourceAndGateStartSetting = 0x62,
    GetStatus = 0x71,
    AutoMeasureVcom = 0x80,
    VcomValue = 0x81,
    /// VCM DC Setting
    ///     1 Databyte
    VcmDcSetting = 0x82,
    ProgramMode = 0xA0,
    ActiveProgram = 0xA1,
    ReadOtpData = 0xA2,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}
