//! Waveform lookup tables, sent on every wake up
//!
//! Values are from the GxEPD Arduino library.

pub(crate) const LUT_VCOM0: &[u8; 15] = &[
    0x0E, 0x14, 0x01, 0x0A, 0x06, 0x04, 0x0A, 0x0A, 0x0F, 0x03, 0x03, 0x0C, 0x06, 0x0A, 0x00,
];

pub(crate) const LUT_WHITE_TO_WHITE: &[u8; 15] = &[
    0x0E, 0x14, 0x01, 0x0A, 0x46, 0x04, 0x8A, 0x4A, 0x0F, 0x83, 0x43, 0x0C, 0x86, 0x0A, 0x04,
];

pub(crate) const LUT_BLACK_TO_WHITE: &[u8; 15] = &[
    0x0E, 0x14, 0x01, 0x8A, 0x06, 0x04, 0x8A, 0x4A, 0x0F, 0x83, 0x43, 0x0C, 0x06, 0x4A, 0x04,
];

pub(crate) const LUT_G1: &[u8; 15] = &[
    0x8E, 0x94, 0x01, 0x8A, 0x06, 0x04, 0x8A, 0x4A, 0x0F, 0x83, 0x43, 0x0C, 0x06, 0x0A, 0x04,
];

pub(crate) const LUT_G2: &[u8; 15] = &[
    0x8E, 0x94, 0x01, 0x8A, 0x06, 0x04, 0x8A, 0x4A, 0x0F, 0x83, 0x43, 0x0C, 0x06, 0x0A, 0x04,
];

pub(crate) const LUT_RED_VCOM: &[u8; 15] = &[
    0x03, 0x1D, 0x01, 0x01, 0x08, 0x23, 0x37, 0x37, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

pub(crate) const LUT_RED0: &[u8; 15] = &[
    0x83, 0x5D, 0x01, 0x81, 0x48, 0x23, 0x77, 0x77, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

pub(crate) const LUT_RED1: &[u8; 15] = &[
    0x03, 0x1D, 0x01, 0x01, 0x08, 0x23, 0x37, 0x37, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
