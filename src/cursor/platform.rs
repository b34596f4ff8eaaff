//! Serialized cursor handle
//!
//! There is exactly one cursor per process, but many sessions may drive it.
//! [`PlatformCursor`] owns the backend behind a single mutex and is cloned into
//! every session, so a position read and the move computed from it can never
//! interleave with another session's calls.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::device::{ButtonState, ClickKind, MouseButton, PointerDevice, Result};

/// Cloneable, process-wide handle to the pointer backend
#[derive(Clone)]
pub struct PlatformCursor {
    device: Arc<Mutex<Box<dyn PointerDevice>>>,
}

impl PlatformCursor {
    /// Wrap a backend
    pub fn new<D: PointerDevice + 'static>(device: D) -> Self {
        Self {
            device: Arc::new(Mutex::new(Box::new(device))),
        }
    }

    /// Run several primitives under one acquisition of the device lock
    pub fn with_device<R>(&self, f: impl FnOnce(&mut dyn PointerDevice) -> R) -> R {
        let mut device = self.device.lock();
        f(device.as_mut())
    }

    /// Warp the cursor to an absolute position
    pub fn move_absolute(&self, x: i32, y: i32) -> Result<()> {
        self.with_device(|device| device.move_absolute(x, y))
    }

    /// Move the cursor by a relative amount
    pub fn move_relative(&self, dx: i32, dy: i32) -> Result<()> {
        self.with_device(|device| device.move_relative(dx, dy))
    }

    /// Press or release a button
    pub fn set_button(&self, button: MouseButton, state: ButtonState) -> Result<()> {
        self.with_device(|device| device.set_button(button, state))
    }

    /// Perform a click gesture
    pub fn click(&self, kind: ClickKind) -> Result<()> {
        self.with_device(|device| device.click(kind))
    }

    /// Query the screen size
    pub fn screen_size(&self) -> Result<(i32, i32)> {
        self.with_device(|device| device.screen_size())
    }

    /// Query the current cursor position
    pub fn position(&self) -> Result<(i32, i32)> {
        self.with_device(|device| device.position())
    }
}

impl fmt::Debug for PlatformCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformCursor")
            .field("handles", &Arc::strong_count(&self.device))
            .finish()
    }
}
