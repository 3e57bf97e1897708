//! Virtual desktop metrics and DPI awareness.

use tracing::{debug, instrument};
use windows::Win32::UI::HiDpi::{
    SetThreadDpiAwarenessContext, DPI_AWARENESS_CONTEXT_SYSTEM_AWARE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};

use crate::error::CaptureError;
use crate::geometry::VirtualDesktop;
use crate::CaptureResult;

/// Query the bounding rectangle of all monitors.
#[instrument(name = "query_virtual_desktop")]
pub fn query_virtual_desktop() -> CaptureResult<VirtualDesktop> {
    let (x, y, width, height) = unsafe {
        (
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN),
            GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    };

    debug!(x, y, width, height, "Virtual screen metrics");
    VirtualDesktop::from_metrics(x, y, width, height)
}

/// Mark the calling thread system DPI aware.
///
/// Without this, a per-monitor scaled desktop reports virtualized
/// coordinates that do not match the pixels BitBlt reads.
pub fn declare_system_dpi_awareness() -> CaptureResult<()> {
    let previous = unsafe { SetThreadDpiAwarenessContext(DPI_AWARENESS_CONTEXT_SYSTEM_AWARE) };

    if previous.0.is_null() {
        return Err(CaptureError::WindowsApi {
            message: "SetThreadDpiAwarenessContext rejected the system aware context"
                .to_string(),
            source: Some(windows::core::Error::from_win32()),
        });
    }

    Ok(())
}
