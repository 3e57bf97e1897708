//! Error types for the capture module.

use std::fmt;

use thiserror::Error;

/// Native resource owned by a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceResource {
    /// Device context of the whole screen.
    ScreenContext,
    /// Off-screen device context compatible with the screen.
    MemoryContext,
    /// Bitmap backing the off-screen context.
    CaptureBitmap,
    /// Selection of the capture bitmap into the off-screen context.
    BitmapSelection,
}

impl fmt::Display for SurfaceResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ScreenContext => "screen device context",
            Self::MemoryContext => "off-screen device context",
            Self::CaptureBitmap => "capture bitmap",
            Self::BitmapSelection => "bitmap selection",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A native resource could not be acquired while building a surface.
    #[error("Failed to acquire {resource}: {message}")]
    ResourceAcquisition {
        resource: SurfaceResource,
        message: String,
        #[cfg(windows)]
        #[source]
        source: Option<windows::core::Error>,
    },

    /// Windows API error.
    #[error("Windows API error: {message}")]
    WindowsApi {
        message: String,
        #[cfg(windows)]
        #[source]
        source: Option<windows::core::Error>,
    },

    /// The virtual desktop reported no pixels to capture.
    #[error("Virtual desktop is empty ({width}x{height})")]
    EmptyDesktop { width: i32, height: i32 },
}

impl CaptureError {
    /// Acquisition failure without an underlying platform error.
    pub fn acquisition(resource: SurfaceResource, message: impl Into<String>) -> Self {
        Self::ResourceAcquisition {
            resource,
            message: message.into(),
            #[cfg(windows)]
            source: None,
        }
    }

    /// Platform call failure without an underlying platform error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::WindowsApi {
            message: message.into(),
            #[cfg(windows)]
            source: None,
        }
    }

    /// The resource this error failed to acquire, if any.
    pub fn resource(&self) -> Option<SurfaceResource> {
        match self {
            Self::ResourceAcquisition { resource, .. } => Some(*resource),
            _ => None,
        }
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for CaptureError {
    fn from(err: windows::core::Error) -> Self {
        Self::WindowsApi {
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}
