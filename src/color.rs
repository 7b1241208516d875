//! Pixel colors of the black/red panel

/// One of the three colors the panel can show
///
/// The panel composes two planes. On the wire a set bit is "no ink": a set bit in the
/// black plane is white, a clear bit is black, and a clear bit in the red plane is red.
/// An all-`0xFF` stream therefore blanks both planes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TriColor {
    /// Black color
    Black,
    /// White color
    #[default]
    White,
    /// Red color
    Red,
}

impl TriColor {
    /// Bit stored in the black plane for this color
    ///
    /// `None` when the color doesn't care about the black plane.
    pub fn black_bit(&self) -> Option<bool> {
        match self {
            TriColor::White => Some(true),
            TriColor::Black => Some(false),
            TriColor::Red => None,
        }
    }

    /// Bit stored in the red plane for this color
    pub fn red_bit(&self) -> bool {
        !matches!(self, TriColor::Red)
    }

    /// Byte values `(black, red)` filling eight pixels with this color
    pub fn get_byte_values(&self) -> (u8, u8) {
        match self {
            TriColor::White => (0xFF, 0xFF),
            TriColor::Black => (0x00, 0xFF),
            TriColor::Red => (0xFF, 0x00),
        }
    }

    /// Decode the color of a pixel from its two plane bits
    ///
    /// A clear red bit wins over the black plane.
    pub fn from_bits(black: bool, red: bool) -> Self {
        match (black, red) {
            (_, false) => TriColor::Red,
            (false, true) => TriColor::Black,
            (true, true) => TriColor::White,
        }
    }
}
