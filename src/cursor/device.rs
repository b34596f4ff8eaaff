//! Pointer device primitives
//!
//! The operations a platform backend must provide. Every backend drives a
//! single physical (or virtual) cursor; callers never talk to a backend
//! directly but go through [`PlatformCursor`](super::PlatformCursor), which
//! serializes access.

use thiserror::Error;

/// Result type for pointer device operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Pointer device error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Backend could not be reached (display server gone, permission revoked)
    #[error("Pointer backend unavailable: {0}")]
    Unavailable(String),

    /// Backend rejected a single operation
    #[error("Pointer operation failed: {0}")]
    OperationFailed(String),
}

/// Mouse buttons a remote client can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
}

/// Button position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// Released
    Up,
    /// Held down
    Down,
}

impl ButtonState {
    /// Parse the wire spelling (`down` / `up`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "down" => Some(ButtonState::Down),
            "up" => Some(ButtonState::Up),
            _ => None,
        }
    }
}

/// Click gestures the platform performs as a single primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    /// Left button press + release
    Left,
    /// Right button press + release
    Right,
    /// Two left clicks within the platform double-click interval
    Double,
}

impl ClickKind {
    /// Parse the wire spelling (`left` / `right` / `double`)
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" => Some(ClickKind::Left),
            "right" => Some(ClickKind::Right),
            "double" => Some(ClickKind::Double),
            _ => None,
        }
    }

    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickKind::Left => "left",
            ClickKind::Right => "right",
            ClickKind::Double => "double",
        }
    }
}

/// Primitive cursor operations provided by a platform backend
///
/// Implementations are driven from one thread at a time; the
/// [`PlatformCursor`](super::PlatformCursor) handle holds the lock.
#[cfg_attr(test, mockall::automock)]
pub trait PointerDevice: Send {
    /// Warp the cursor to an absolute screen position
    fn move_absolute(&mut self, x: i32, y: i32) -> Result<()>;

    /// Move the cursor by a relative amount
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<()>;

    /// Press or release a button
    fn set_button(&mut self, button: MouseButton, state: ButtonState) -> Result<()>;

    /// Perform a complete click gesture
    fn click(&mut self, kind: ClickKind) -> Result<()>;

    /// Screen dimensions in pixels (width, height)
    fn screen_size(&mut self) -> Result<(i32, i32)>;

    /// Current cursor position
    fn position(&mut self) -> Result<(i32, i32)>;
}
