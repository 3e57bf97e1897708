//! Blit-and-readback capture of the virtual desktop.

use image::RgbaImage;
use tracing::{debug, info, instrument, trace, warn};

use crate::api::DisplayApi;
use crate::frame::{aligned_region, bgra_to_rgba, ALIGNMENT_SLACK};
use crate::geometry::VirtualDesktop;
use crate::surface::DisplaySurface;
use crate::{CaptureResult, FrameSource};

/// Captures the whole virtual desktop into a reusable RGBA image.
///
/// Both the image and the raw scratch buffer are allocated once and
/// overwritten by every [`FrameCapturer::grab`].
pub struct FrameCapturer<A: DisplayApi> {
    surface: DisplaySurface<A>,
    desktop: VirtualDesktop,
    image: RgbaImage,
    scratch: Vec<u8>,
    frames: u64,
}

#[cfg(windows)]
impl FrameCapturer<crate::gdi::GdiApi> {
    /// Create a capturer backed by the Windows GDI.
    ///
    /// Must be called on the thread that will call [`FrameCapturer::grab`].
    pub fn new() -> CaptureResult<Self> {
        Self::with_api(crate::gdi::GdiApi)
    }
}

impl<A: DisplayApi> FrameCapturer<A> {
    /// Create a capturer on top of the given platform API.
    #[instrument(name = "frame_capturer_new", skip_all)]
    pub fn with_api(api: A) -> CaptureResult<Self> {
        let surface = DisplaySurface::new(api)?;
        let desktop = surface.desktop();

        let image = RgbaImage::new(desktop.width, desktop.height);
        let scratch = vec![0u8; desktop.frame_len() + ALIGNMENT_SLACK];

        info!(
            x = desktop.x,
            y = desktop.y,
            width = desktop.width,
            height = desktop.height,
            "Frame capturer ready"
        );

        Ok(Self {
            surface,
            desktop,
            image,
            scratch,
            frames: 0,
        })
    }

    /// Snapshot the screen and return the converted frame.
    ///
    /// Platform failures are logged and the buffer is returned as it stands,
    /// so one bad frame never stops a long recording. The reference is only
    /// valid until the next call.
    pub fn grab(&mut self) -> &RgbaImage {
        let frame = self.frames;
        self.frames += 1;
        trace!(frame, "Grabbing frame");

        if let Err(e) = self.surface.blit_from_screen() {
            warn!(frame, "Screen copy failed: {}", e);
        }

        let raw = aligned_region(&mut self.scratch, self.desktop.frame_len());

        if let Err(e) = self.surface.select_previous_bitmap() {
            warn!(frame, "Failed to deselect capture bitmap: {}", e);
        }
        match self.surface.read_capture_bitmap(raw) {
            Ok(lines) if lines != self.desktop.height => {
                debug!(frame, lines, "Readback returned fewer scan lines than expected");
            }
            Ok(_) => {}
            Err(e) => warn!(frame, "Bitmap readback failed: {}", e),
        }
        if let Err(e) = self.surface.select_capture_bitmap() {
            warn!(frame, "Failed to reselect capture bitmap: {}", e);
        }

        bgra_to_rgba(raw, &mut self.image);
        &self.image
    }

    /// Rectangle being captured.
    pub fn desktop(&self) -> VirtualDesktop {
        self.desktop
    }

    /// Number of grab calls so far.
    pub fn frames_grabbed(&self) -> u64 {
        self.frames
    }

    /// Release the native resources.
    pub fn dispose(self) {
        debug!(frames = self.frames, "Disposing frame capturer");
    }

    #[cfg(test)]
    pub(crate) fn scratch_len(&self) -> usize {
        self.scratch.len()
    }

    #[cfg(test)]
    pub(crate) fn surface(&self) -> &DisplaySurface<A> {
        &self.surface
    }
}

impl<A: DisplayApi> FrameSource for FrameCapturer<A> {
    fn grab(&mut self) -> &RgbaImage {
        FrameCapturer::grab(self)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.desktop.width, self.desktop.height)
    }
}
