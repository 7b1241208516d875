//! Black plane wire format
//!
//! Transmission 1 of this controller takes two bits per pixel while the framebuffer holds
//! one. Every bit is doubled in place, MSB first, so one framebuffer byte becomes two
//! bytes on the wire. The red plane goes out unchanged.

/// Input bytes expanded per SPI write
pub(crate) const EXPAND_CHUNK: usize = 32;

/// Doubles every bit of `bits`
///
/// Bit 7 becomes bits 15 and 14 of the result, bit 0 becomes bits 1 and 0.
/// The high nibble ends up in the first byte.
pub fn expand_bits(bits: u8) -> [u8; 2] {
    let mut x = bits as u16;

    x = (x | (x << 4)) & 0x0F0F;
    x = (x | (x << 2)) & 0x3333;
    x = (x | (x << 1)) & 0x5555;
    x = x | (x << 1);

    [(x >> 8) as u8, (x & 0xFF) as u8]
}

/// Expands `src` into the front of `dst` and returns the number of bytes written
///
/// `dst` must hold at least `2 * src.len()` bytes, anything beyond that is left alone.
pub fn expand_into(src: &[u8], dst: &mut [u8]) -> usize {
    for (b, out) in src.iter().zip(dst.chunks_exact_mut(2)) {
        out.copy_from_slice(&expand_bits(*b));
    }
    (2 * src.len()).min(dst.len() & !1)
}
