//! Virtual desktop geometry.

use crate::error::CaptureError;
use crate::CaptureResult;

/// Bytes per captured pixel, both for the raw readback and the RGBA output.
pub const BYTES_PER_PIXEL: usize = 4;

/// Bounding rectangle spanning all connected monitors.
///
/// The origin is relative to the primary monitor and is negative when a
/// secondary monitor lies to the left of or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualDesktop {
    /// Left edge in screen coordinates.
    pub x: i32,

    /// Top edge in screen coordinates.
    pub y: i32,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl VirtualDesktop {
    /// Build from raw system metric values, rejecting empty extents.
    pub fn from_metrics(x: i32, y: i32, width: i32, height: i32) -> CaptureResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(CaptureError::EmptyDesktop { width, height });
        }

        Ok(Self {
            x,
            y,
            width: width as u32,
            height: height as u32,
        })
    }

    /// Number of pixels in the rectangle.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of one packed 32-bit frame in bytes.
    pub fn frame_len(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }
}
