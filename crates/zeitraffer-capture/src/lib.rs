//! Virtual-desktop screen capture through the Windows GDI.
//!
//! A [`FrameCapturer`] owns a [`DisplaySurface`] (screen context, off-screen
//! context and a bitmap covering every monitor) and turns each blit of the
//! screen into an opaque RGBA [`image::RgbaImage`] that is reused between
//! frames.

mod api;
mod capturer;
mod error;
mod frame;
#[cfg(windows)]
mod gdi;
mod geometry;
mod surface;
#[cfg(test)]
mod testing;

pub use api::{DisplayApi, RawHandle};
pub use capturer::FrameCapturer;
pub use error::{CaptureError, SurfaceResource};
pub use frame::{aligned_region, alignment_offset, bgra_to_rgba, ALIGNMENT_SLACK};
#[cfg(windows)]
pub use gdi::{query_virtual_desktop, GdiApi};
pub use geometry::{VirtualDesktop, BYTES_PER_PIXEL};
pub use surface::DisplaySurface;

use image::RgbaImage;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// GDI-backed capturer used by the recorder binary.
#[cfg(windows)]
pub type ScreenCapturer = FrameCapturer<GdiApi>;

/// Trait for frame sources.
pub trait FrameSource {
    /// Capture one frame. The image is only valid until the next call.
    fn grab(&mut self) -> &RgbaImage;

    /// Get the frame dimensions.
    fn dimensions(&self) -> (u32, u32);
}
