//! Windows GDI backend.

mod desktop;

pub use desktop::{declare_system_dpi_awareness, query_virtual_desktop};

use std::ffi::c_void;

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
    GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
    HBITMAP, HDC, HGDIOBJ, SRCCOPY,
};

use crate::api::{DisplayApi, RawHandle};
use crate::error::{CaptureError, SurfaceResource};
use crate::geometry::{VirtualDesktop, BYTES_PER_PIXEL};
use crate::CaptureResult;

/// [`DisplayApi`] implemented with user32/gdi32 calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdiApi;

fn hdc(handle: RawHandle) -> HDC {
    HDC(handle.0 as *mut c_void)
}

fn hbitmap(handle: RawHandle) -> HBITMAP {
    HBITMAP(handle.0 as *mut c_void)
}

fn hgdiobj(handle: RawHandle) -> HGDIOBJ {
    HGDIOBJ(handle.0 as *mut c_void)
}

fn acquisition_failed(resource: SurfaceResource, call: &str) -> CaptureError {
    CaptureError::ResourceAcquisition {
        resource,
        message: format!("{} returned a null handle", call),
        source: Some(windows::core::Error::from_win32()),
    }
}

impl DisplayApi for GdiApi {
    fn declare_dpi_awareness(&self) -> CaptureResult<()> {
        declare_system_dpi_awareness()
    }

    fn acquire_screen_dc(&self) -> CaptureResult<RawHandle> {
        let dc = unsafe { GetDC(HWND::default()) };
        if dc.is_invalid() {
            return Err(acquisition_failed(SurfaceResource::ScreenContext, "GetDC"));
        }
        Ok(RawHandle(dc.0 as isize))
    }

    fn release_screen_dc(&self, dc: RawHandle) -> bool {
        unsafe { ReleaseDC(HWND::default(), hdc(dc)) == 1 }
    }

    fn create_memory_dc(&self, screen_dc: RawHandle) -> CaptureResult<RawHandle> {
        let dc = unsafe { CreateCompatibleDC(hdc(screen_dc)) };
        if dc.is_invalid() {
            return Err(acquisition_failed(
                SurfaceResource::MemoryContext,
                "CreateCompatibleDC",
            ));
        }
        Ok(RawHandle(dc.0 as isize))
    }

    fn delete_memory_dc(&self, dc: RawHandle) -> bool {
        unsafe { DeleteDC(hdc(dc)).as_bool() }
    }

    fn create_bitmap(
        &self,
        screen_dc: RawHandle,
        width: u32,
        height: u32,
    ) -> CaptureResult<RawHandle> {
        let bitmap =
            unsafe { CreateCompatibleBitmap(hdc(screen_dc), width as i32, height as i32) };
        if bitmap.is_invalid() {
            return Err(acquisition_failed(
                SurfaceResource::CaptureBitmap,
                "CreateCompatibleBitmap",
            ));
        }
        Ok(RawHandle(bitmap.0 as isize))
    }

    fn delete_bitmap(&self, bitmap: RawHandle) -> bool {
        unsafe { DeleteObject(hgdiobj(bitmap)).as_bool() }
    }

    fn select_object(&self, dc: RawHandle, object: RawHandle) -> CaptureResult<RawHandle> {
        let previous = unsafe { SelectObject(hdc(dc), hgdiobj(object)) };
        if previous.is_invalid() {
            return Err(CaptureError::WindowsApi {
                message: "SelectObject failed".to_string(),
                source: Some(windows::core::Error::from_win32()),
            });
        }
        Ok(RawHandle(previous.0 as isize))
    }

    fn bit_blt(
        &self,
        dst: RawHandle,
        width: u32,
        height: u32,
        src: RawHandle,
        src_x: i32,
        src_y: i32,
    ) -> CaptureResult<()> {
        unsafe {
            BitBlt(
                hdc(dst),
                0,
                0,
                width as i32,
                height as i32,
                hdc(src),
                src_x,
                src_y,
                SRCCOPY,
            )?;
        }
        Ok(())
    }

    fn read_bitmap(
        &self,
        dc: RawHandle,
        bitmap: RawHandle,
        width: u32,
        height: u32,
        out: &mut [u8],
    ) -> CaptureResult<u32> {
        let needed = width as usize * height as usize * BYTES_PER_PIXEL;
        if out.len() < needed {
            return Err(CaptureError::api(format!(
                "Readback buffer holds {} bytes, {} needed",
                out.len(),
                needed
            )));
        }

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width as i32,
                // Negative height requests top-down rows.
                biHeight: -(height as i32),
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                biSizeImage: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let lines = unsafe {
            GetDIBits(
                hdc(dc),
                hbitmap(bitmap),
                0,
                height,
                Some(out.as_mut_ptr() as *mut c_void),
                &mut info,
                DIB_RGB_COLORS,
            )
        };

        if lines <= 0 {
            return Err(CaptureError::WindowsApi {
                message: "GetDIBits copied no scan lines".to_string(),
                source: Some(windows::core::Error::from_win32()),
            });
        }

        Ok(lines as u32)
    }

    fn virtual_desktop(&self) -> CaptureResult<VirtualDesktop> {
        query_virtual_desktop()
    }
}
