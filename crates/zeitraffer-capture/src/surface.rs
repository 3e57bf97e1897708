//! Display surface binding: screen context, off-screen context and bitmap.

use std::marker::PhantomData;

use tracing::{debug, instrument, warn};

use crate::api::{DisplayApi, RawHandle};
use crate::error::{CaptureError, SurfaceResource};
use crate::geometry::VirtualDesktop;
use crate::CaptureResult;

/// Paired native resources used to snapshot the virtual desktop.
///
/// The capture bitmap stays selected into the off-screen context except
/// between [`DisplaySurface::select_previous_bitmap`] and
/// [`DisplaySurface::select_capture_bitmap`]. Handles are bound to the
/// thread that created them, so the type is neither `Send` nor `Clone`.
pub struct DisplaySurface<A: DisplayApi> {
    api: A,
    screen_dc: RawHandle,
    memory_dc: RawHandle,
    bitmap: RawHandle,
    previous_bitmap: RawHandle,
    desktop: VirtualDesktop,
    _thread_bound: PhantomData<*const ()>,
}

impl<A: DisplayApi> DisplaySurface<A> {
    /// Acquire all resources, releasing the ones already held if any step fails.
    #[instrument(name = "display_surface_new", skip_all)]
    pub fn new(api: A) -> CaptureResult<Self> {
        if let Err(e) = api.declare_dpi_awareness() {
            warn!("Could not set DPI awareness, coordinates may be scaled: {}", e);
        }

        let screen_dc = api.acquire_screen_dc()?;

        let desktop = match api.virtual_desktop() {
            Ok(desktop) => desktop,
            Err(e) => {
                release_screen(&api, screen_dc);
                return Err(e);
            }
        };
        debug!(
            x = desktop.x,
            y = desktop.y,
            width = desktop.width,
            height = desktop.height,
            "Queried virtual desktop"
        );

        let memory_dc = match api.create_memory_dc(screen_dc) {
            Ok(dc) => dc,
            Err(e) => {
                release_screen(&api, screen_dc);
                return Err(e);
            }
        };

        let bitmap = match api.create_bitmap(screen_dc, desktop.width, desktop.height) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                delete_memory(&api, memory_dc);
                release_screen(&api, screen_dc);
                return Err(e);
            }
        };

        let previous_bitmap = match api.select_object(memory_dc, bitmap) {
            Ok(previous) => previous,
            Err(e) => {
                delete_memory(&api, memory_dc);
                delete_bitmap(&api, bitmap);
                release_screen(&api, screen_dc);
                return Err(CaptureError::acquisition(
                    SurfaceResource::BitmapSelection,
                    e.to_string(),
                ));
            }
        };

        debug!("Acquired display surface");
        Ok(Self {
            api,
            screen_dc,
            memory_dc,
            bitmap,
            previous_bitmap,
            desktop,
            _thread_bound: PhantomData,
        })
    }

    /// Rectangle this surface captures.
    pub fn desktop(&self) -> VirtualDesktop {
        self.desktop
    }

    /// Copy the live screen into the capture bitmap.
    pub fn blit_from_screen(&self) -> CaptureResult<()> {
        self.api.bit_blt(
            self.memory_dc,
            self.desktop.width,
            self.desktop.height,
            self.screen_dc,
            self.desktop.x,
            self.desktop.y,
        )
    }

    /// Put back the bitmap the off-screen context came with.
    pub fn select_previous_bitmap(&self) -> CaptureResult<()> {
        self.api
            .select_object(self.memory_dc, self.previous_bitmap)
            .map(|_| ())
    }

    /// Select the capture bitmap into the off-screen context again.
    pub fn select_capture_bitmap(&self) -> CaptureResult<()> {
        self.api.select_object(self.memory_dc, self.bitmap).map(|_| ())
    }

    /// Read the capture bitmap as top-down BGRA into `out`.
    ///
    /// The capture bitmap must be deselected first.
    pub fn read_capture_bitmap(&self, out: &mut [u8]) -> CaptureResult<u32> {
        self.api.read_bitmap(
            self.memory_dc,
            self.bitmap,
            self.desktop.width,
            self.desktop.height,
            out,
        )
    }
}

impl<A: DisplayApi> Drop for DisplaySurface<A> {
    fn drop(&mut self) {
        // Deleting the context drops its selection before the bitmap goes.
        delete_memory(&self.api, self.memory_dc);
        delete_bitmap(&self.api, self.bitmap);
        release_screen(&self.api, self.screen_dc);
        debug!("Released display surface");
    }
}

fn release_screen<A: DisplayApi>(api: &A, dc: RawHandle) {
    if !api.release_screen_dc(dc) {
        warn!(handle = dc.0, "Failed to release screen device context");
    }
}

fn delete_memory<A: DisplayApi>(api: &A, dc: RawHandle) {
    if !api.delete_memory_dc(dc) {
        warn!(handle = dc.0, "Failed to delete off-screen device context");
    }
}

fn delete_bitmap<A: DisplayApi>(api: &A, bitmap: RawHandle) {
    if !api.delete_bitmap(bitmap) {
        warn!(handle = bitmap.0, "Failed to delete capture bitmap");
    }
}
