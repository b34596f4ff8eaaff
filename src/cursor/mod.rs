//! Platform cursor
//!
//! This module provides the single process-wide cursor every session drives.
//!
//! # Backends
//!
//! | Backend | Description | Use Case |
//! |---------|-------------|----------|
//! | Virtual | In-memory position + event log | Headless, self-test, tests |
//!
//! Native backends implement [`PointerDevice`]; nothing above this module
//! depends on which backend is in use.
//!
//! # Architecture
//!
//! ```text
//! Session A ─┐
//! Session B ─┼─> PlatformCursor (Arc<Mutex<..>>)
//! Session C ─┘       └─> Box<dyn PointerDevice>
//!                         └─> VirtualPointer / native backend
//! ```
//!
//! Every call takes the one device lock, so two sessions can never observe
//! each other's half-finished read-then-move.

use crate::config::PointerConfig;

mod device;
mod platform;
mod virtual_pointer;

pub use device::{
    ButtonState, ClickKind, MouseButton, PlatformError, PointerDevice, Result as PlatformResult,
};
pub use platform::PlatformCursor;
pub use virtual_pointer::{PointerEvent, PointerLog, VirtualPointer, DEFAULT_LOG_CAPACITY};

#[cfg(test)]
pub(crate) use device::MockPointerDevice;

/// Backend names accepted in configuration
pub const SUPPORTED_BACKENDS: &[&str] = &["virtual"];

/// Screen size used when a backend reports none
pub const FALLBACK_SCREEN_SIZE: (i32, i32) = (1920, 1080);

/// Open the backend named in `config`
///
/// The virtual pointer starts in the middle of the configured screen.
pub fn open_backend(config: &PointerConfig) -> PlatformResult<PlatformCursor> {
    match config.backend.as_str() {
        "virtual" => {
            let (width, height) = (config.screen_width, config.screen_height);
            let pointer = VirtualPointer::new(width, height).with_position(width / 2, height / 2);
            Ok(PlatformCursor::new(pointer))
        }
        other => Err(PlatformError::Unavailable(format!(
            "unsupported pointer backend: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_virtual_backend() {
        let cursor = open_backend(&PointerConfig::default()).unwrap();
        assert_eq!(cursor.screen_size().unwrap(), (1920, 1080));
        assert_eq!(cursor.position().unwrap(), (960, 540));
    }

    #[test]
    fn test_open_unknown_backend() {
        let config = PointerConfig {
            backend: "uinput".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            open_backend(&config),
            Err(PlatformError::Unavailable(_))
        ));
    }
}
