//! Platform display-surface API consumed by the capture core.

use crate::geometry::VirtualDesktop;
use crate::CaptureResult;

/// Opaque platform handle (device context, bitmap or other GDI object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(pub isize);

/// Calls a display surface needs from the platform.
///
/// Handles passed in are always ones previously returned by the same
/// implementation. Release calls report success as a `bool` so callers can
/// log a failed release without aborting teardown.
pub trait DisplayApi {
    /// Opt the calling thread out of per-monitor DPI virtualization.
    fn declare_dpi_awareness(&self) -> CaptureResult<()>;

    /// Device context covering the whole screen.
    fn acquire_screen_dc(&self) -> CaptureResult<RawHandle>;

    /// Release a context from [`DisplayApi::acquire_screen_dc`].
    fn release_screen_dc(&self, dc: RawHandle) -> bool;

    /// Off-screen context compatible with `screen_dc`.
    fn create_memory_dc(&self, screen_dc: RawHandle) -> CaptureResult<RawHandle>;

    /// Delete a context from [`DisplayApi::create_memory_dc`].
    fn delete_memory_dc(&self, dc: RawHandle) -> bool;

    /// Bitmap compatible with `screen_dc`.
    fn create_bitmap(
        &self,
        screen_dc: RawHandle,
        width: u32,
        height: u32,
    ) -> CaptureResult<RawHandle>;

    /// Delete a bitmap from [`DisplayApi::create_bitmap`].
    fn delete_bitmap(&self, bitmap: RawHandle) -> bool;

    /// Select `object` into `dc`, returning the object it replaced.
    fn select_object(&self, dc: RawHandle, object: RawHandle) -> CaptureResult<RawHandle>;

    /// Copy `width`x`height` pixels at (`src_x`, `src_y`) of `src` to the
    /// origin of `dst`, without raster blending.
    fn bit_blt(
        &self,
        dst: RawHandle,
        width: u32,
        height: u32,
        src: RawHandle,
        src_x: i32,
        src_y: i32,
    ) -> CaptureResult<()>;

    /// Read `bitmap` as top-down 32-bit BGRA rows into `out`.
    ///
    /// `bitmap` must not be selected into `dc`. Returns the number of
    /// scan lines copied.
    fn read_bitmap(
        &self,
        dc: RawHandle,
        bitmap: RawHandle,
        width: u32,
        height: u32,
        out: &mut [u8],
    ) -> CaptureResult<u32>;

    /// Origin and extent of the virtual desktop.
    fn virtual_desktop(&self) -> CaptureResult<VirtualDesktop>;
}
