//! Recording `DisplayApi` double for unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::api::{DisplayApi, RawHandle};
use crate::error::{CaptureError, SurfaceResource};
use crate::geometry::VirtualDesktop;
use crate::CaptureResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DeclareDpiAwareness,
    AcquireScreenDc,
    ReleaseScreenDc(RawHandle),
    CreateMemoryDc(RawHandle),
    DeleteMemoryDc(RawHandle),
    CreateBitmap(RawHandle, u32, u32),
    DeleteBitmap(RawHandle),
    Select(RawHandle, RawHandle),
    BitBlt {
        dst: RawHandle,
        width: u32,
        height: u32,
        src: RawHandle,
        src_x: i32,
        src_y: i32,
    },
    ReadBitmap(RawHandle, RawHandle, u32, u32),
    VirtualDesktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    DpiAwareness,
    ScreenDc,
    Desktop,
    MemoryDc,
    Bitmap,
    InitialSelect,
    Blit,
    Readback,
}

#[derive(Debug)]
struct State {
    calls: Vec<Call>,
    held: HashSet<RawHandle>,
    selected: Option<RawHandle>,
    fail_at: Option<FailAt>,
    pixel: [u8; 4],
    read_targets: Vec<(usize, usize)>,
}

/// Fake GDI that logs every call and tracks which handles are alive.
#[derive(Debug, Clone)]
pub struct RecordingApi {
    desktop: VirtualDesktop,
    state: Rc<RefCell<State>>,
}

impl RecordingApi {
    pub const SCREEN_DC: RawHandle = RawHandle(0x10);
    pub const MEMORY_DC: RawHandle = RawHandle(0x20);
    pub const BITMAP: RawHandle = RawHandle(0x30);
    pub const STOCK_BITMAP: RawHandle = RawHandle(0x40);

    pub fn new(desktop: VirtualDesktop) -> Self {
        Self {
            desktop,
            state: Rc::new(RefCell::new(State {
                calls: Vec::new(),
                held: HashSet::new(),
                selected: None,
                fail_at: None,
                pixel: [0, 0, 0, 0],
                read_targets: Vec::new(),
            })),
        }
    }

    pub fn failing_at(self, step: FailAt) -> Self {
        self.set_failure(Some(step));
        self
    }

    pub fn set_failure(&self, step: Option<FailAt>) {
        self.state.borrow_mut().fail_at = step;
    }

    /// BGRA value every pixel of the fake screen reads back as.
    pub fn with_pixel(self, bgra: [u8; 4]) -> Self {
        self.set_pixel(bgra);
        self
    }

    pub fn set_pixel(&self, bgra: [u8; 4]) {
        self.state.borrow_mut().pixel = bgra;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn release_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::ReleaseScreenDc(_) | Call::DeleteMemoryDc(_) | Call::DeleteBitmap(_)
                )
            })
            .collect()
    }

    pub fn all_released(&self) -> bool {
        self.state.borrow().held.is_empty()
    }

    pub fn selected(&self) -> Option<RawHandle> {
        self.state.borrow().selected
    }

    /// Address residue mod 4 and length of every readback destination.
    pub fn read_targets(&self) -> Vec<(usize, usize)> {
        self.state.borrow().read_targets.clone()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn fails(&self, step: FailAt) -> bool {
        self.state.borrow().fail_at == Some(step)
    }

    fn acquire(
        &self,
        handle: RawHandle,
        step: FailAt,
        resource: SurfaceResource,
    ) -> CaptureResult<RawHandle> {
        if self.fails(step) {
            return Err(CaptureError::acquisition(resource, "denied by test"));
        }
        self.state.borrow_mut().held.insert(handle);
        Ok(handle)
    }

    fn release(&self, handle: RawHandle) -> bool {
        self.state.borrow_mut().held.remove(&handle)
    }
}

impl DisplayApi for RecordingApi {
    fn declare_dpi_awareness(&self) -> CaptureResult<()> {
        self.record(Call::DeclareDpiAwareness);
        if self.fails(FailAt::DpiAwareness) {
            return Err(CaptureError::api("DPI awareness rejected"));
        }
        Ok(())
    }

    fn acquire_screen_dc(&self) -> CaptureResult<RawHandle> {
        self.record(Call::AcquireScreenDc);
        self.acquire(Self::SCREEN_DC, FailAt::ScreenDc, SurfaceResource::ScreenContext)
    }

    fn release_screen_dc(&self, dc: RawHandle) -> bool {
        self.record(Call::ReleaseScreenDc(dc));
        self.release(dc)
    }

    fn create_memory_dc(&self, screen_dc: RawHandle) -> CaptureResult<RawHandle> {
        self.record(Call::CreateMemoryDc(screen_dc));
        let dc = self.acquire(Self::MEMORY_DC, FailAt::MemoryDc, SurfaceResource::MemoryContext)?;
        self.state.borrow_mut().selected = Some(Self::STOCK_BITMAP);
        Ok(dc)
    }

    fn delete_memory_dc(&self, dc: RawHandle) -> bool {
        self.record(Call::DeleteMemoryDc(dc));
        self.state.borrow_mut().selected = None;
        self.release(dc)
    }

    fn create_bitmap(
        &self,
        screen_dc: RawHandle,
        width: u32,
        height: u32,
    ) -> CaptureResult<RawHandle> {
        self.record(Call::CreateBitmap(screen_dc, width, height));
        self.acquire(Self::BITMAP, FailAt::Bitmap, SurfaceResource::CaptureBitmap)
    }

    fn delete_bitmap(&self, bitmap: RawHandle) -> bool {
        self.record(Call::DeleteBitmap(bitmap));
        if self.selected() == Some(bitmap) {
            return false;
        }
        self.release(bitmap)
    }

    fn select_object(&self, dc: RawHandle, object: RawHandle) -> CaptureResult<RawHandle> {
        self.record(Call::Select(dc, object));
        if self.fails(FailAt::InitialSelect) {
            return Err(CaptureError::api("SelectObject failed"));
        }
        let mut state = self.state.borrow_mut();
        let previous = state
            .selected
            .replace(object)
            .ok_or_else(|| CaptureError::api("no object selected"))?;
        Ok(previous)
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
        self.record(Call::BitBlt {
            dst,
            width,
            height,
            src,
            src_x,
            src_y,
        });
        if self.fails(FailAt::Blit) {
            return Err(CaptureError::api("BitBlt failed"));
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
        self.record(Call::ReadBitmap(dc, bitmap, width, height));
        self.state
            .borrow_mut()
            .read_targets
            .push((out.as_ptr() as usize % 4, out.len()));

        if self.fails(FailAt::Readback) {
            return Err(CaptureError::api("GetDIBits failed"));
        }
        if self.selected() == Some(bitmap) {
            return Err(CaptureError::api("bitmap is still selected"));
        }

        let pixel = self.state.borrow().pixel;
        for chunk in out.chunks_exact_mut(4) {
            chunk.copy_from_slice(&pixel);
        }
        Ok(height)
    }

    fn virtual_desktop(&self) -> CaptureResult<VirtualDesktop> {
        self.record(Call::VirtualDesktop);
        if self.fails(FailAt::Desktop) {
            return VirtualDesktop::from_metrics(0, 0, 0, 0);
        }
        Ok(self.desktop)
    }
}
