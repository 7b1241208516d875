//! Framebuffers for the two panel planes

use bit_field::BitField;

use crate::color::TriColor;
use crate::epd1in54b::{BUFFER_SIZE, HEIGHT, WIDTH};

/// Black and red plane of one frame
///
/// One bit per pixel, row-major, MSB first within a byte. Both planes always have
/// `WIDTH * HEIGHT / 8` bytes. The bytes are sent to the panel exactly as stored; see
/// [`TriColor`] for what a set bit means on each plane.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffers {
    black: [u8; BUFFER_SIZE],
    red: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrameBuffers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffers")
            .field("len", &BUFFER_SIZE)
            .finish_non_exhaustive()
    }
}

impl FrameBuffers {
    /// Both planes zeroed
    pub const fn new() -> Self {
        FrameBuffers {
            black: [0; BUFFER_SIZE],
            red: [0; BUFFER_SIZE],
        }
    }

    /// Planes seeded by the caller
    pub const fn from_planes(black: [u8; BUFFER_SIZE], red: [u8; BUFFER_SIZE]) -> Self {
        FrameBuffers { black, red }
    }

    /// Both planes filled with `color`
    pub fn filled(color: TriColor) -> Self {
        let mut buffers = Self::new();
        buffers.clear(color);
        buffers
    }

    pub fn black(&self) -> &[u8; BUFFER_SIZE] {
        &self.black
    }

    pub fn red(&self) -> &[u8; BUFFER_SIZE] {
        &self.red
    }

    pub fn black_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
        &mut self.black
    }

    pub fn red_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
        &mut self.red
    }

    /// Index of the byte holding pixel (x, y)
    pub const fn byte_index(x: u32, y: u32) -> usize {
        (x as usize / 8) + (WIDTH as usize / 8) * y as usize
    }

    /// Mask of pixel column `x` within its byte
    pub const fn bit_mask(x: u32) -> u8 {
        0x80 >> (x % 8)
    }

    /// Paint one pixel, coordinates outside the panel are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: TriColor) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let index = Self::byte_index(x, y);
        let bit = 7 - (x % 8) as usize;

        if let Some(black) = color.black_bit() {
            self.black[index].set_bit(bit, black);
        }
        self.red[index].set_bit(bit, color.red_bit());
    }

    /// Color of one pixel, `None` outside the panel
    pub fn pixel(&self, x: u32, y: u32) -> Option<TriColor> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        let index = Self::byte_index(x, y);
        let bit = 7 - (x % 8) as usize;

        Some(TriColor::from_bits(
            self.black[index].get_bit(bit),
            self.red[index].get_bit(bit),
        ))
    }

    /// Fill both planes with one color
    pub fn clear(&mut self, color: TriColor) {
        let (black, red) = color.get_byte_values();
        self.black.fill(black);
        self.red.fill(red);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_size() {
        assert_eq!(BUFFER_SIZE, 5000);
        let buffers = FrameBuffers::new();
        assert_eq!(buffers.black().len(), BUFFER_SIZE);
        assert_eq!(buffers.red().len(), BUFFER_SIZE);
        assert!(buffers.black().iter().all(|b| *b == 0));
    }

    #[test]
    fn row_major_msb_first() {
        assert_eq!(FrameBuffers::byte_index(0, 0), 0);
        assert_eq!(FrameBuffers::byte_index(7, 0), 0);
        assert_eq!(FrameBuffers::byte_index(8, 0), 1);
        assert_eq!(FrameBuffers::byte_index(0, 1), 25);
        assert_eq!(FrameBuffers::byte_index(199, 199), BUFFER_SIZE - 1);
        assert_eq!(FrameBuffers::bit_mask(0), 0x80);
        assert_eq!(FrameBuffers::bit_mask(7), 0x01);
        assert_eq!(FrameBuffers::bit_mask(9), 0x40);
    }

    #[test]
    fn set_pixel_touches_one_bit() {
        let mut buffers = FrameBuffers::filled(TriColor::White);

        buffers.set_pixel(9, 1, TriColor::Black);
        assert_eq!(buffers.black()[26], 0xBF);
        assert_eq!(buffers.red()[26], 0xFF);
        assert_eq!(buffers.pixel(9, 1), Some(TriColor::Black));
        assert_eq!(buffers.pixel(8, 1), Some(TriColor::White));

        buffers.set_pixel(0, 0, TriColor::Red);
        assert_eq!(buffers.black()[0], 0xFF);
        assert_eq!(buffers.red()[0], 0x7F);
        assert_eq!(buffers.pixel(0, 0), Some(TriColor::Red));

        buffers.set_pixel(0, 0, TriColor::White);
        assert_eq!(buffers.red()[0], 0xFF);
        assert_eq!(buffers.pixel(0, 0), Some(TriColor::White));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut buffers = FrameBuffers::filled(TriColor::White);
        buffers.set_pixel(WIDTH, 0, TriColor::Black);
        buffers.set_pixel(0, HEIGHT, TriColor::Red);
        assert_eq!(buffers, FrameBuffers::filled(TriColor::White));
        assert_eq!(buffers.pixel(WIDTH, 0), None);
    }

    #[test]
    fn black_and_red_ink_overlap() {
        // both planes inked on the same pixel, red wins
        let buffers = FrameBuffers::from_planes([0x00; BUFFER_SIZE], [0x00; BUFFER_SIZE]);
        assert_eq!(buffers.pixel(3, 3), Some(TriColor::Red));
    }
}
