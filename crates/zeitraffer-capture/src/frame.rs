//! Raw frame buffer helpers.
//!
//! The device-independent bitmap readback wants a 4-byte aligned
//! destination, and delivers packed BGRA quartets that are turned into
//! opaque RGBA here.

use crate::geometry::BYTES_PER_PIXEL;

/// Extra bytes allocated past the payload so an aligned window always fits.
pub const ALIGNMENT_SLACK: usize = 3;

const ALIGNMENT: usize = 4;

/// Distance from `addr` to the next 4-byte boundary, `(-addr) mod 4`.
pub fn alignment_offset(addr: usize) -> usize {
    addr.wrapping_neg() % ALIGNMENT
}

/// Bounded window of `len` bytes inside `buffer` starting at a 4-byte boundary.
///
/// `buffer` must hold at least `len + ALIGNMENT_SLACK` bytes.
pub fn aligned_region(buffer: &mut [u8], len: usize) -> &mut [u8] {
    let offset = alignment_offset(buffer.as_ptr() as usize);
    &mut buffer[offset..offset + len]
}

/// Convert packed BGRA pixels into RGBA, forcing every alpha to 255.
///
/// Source alpha is undefined for screen bitmaps and is never read.
pub fn bgra_to_rgba(bgra: &[u8], rgba: &mut [u8]) {
    for (src, dst) in bgra
        .chunks_exact(BYTES_PER_PIXEL)
        .zip(rgba.chunks_exact_mut(BYTES_PER_PIXEL))
    {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
        dst[3] = u8::MAX;
    }
}
