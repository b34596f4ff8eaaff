//! In-memory pointer backend
//!
//! Tracks position and button state without touching the host display. Used
//! for headless runs, the self-test, and tests. Every operation is appended to
//! a shared [`PointerLog`] so callers can see exactly what was dispatched. The
//! log keeps only the most recent [`DEFAULT_LOG_CAPACITY`] events.
//!
//! The virtual screen does not confine the cursor: a move outside the screen
//! is recorded as requested. Confinement is the pipeline's job.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

use super::device::{ButtonState, ClickKind, MouseButton, PointerDevice, Result};

/// One primitive dispatched to the virtual device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Absolute warp
    MovedTo {
        /// Target X
        x: i32,
        /// Target Y
        y: i32,
    },
    /// Relative move
    MovedBy {
        /// Horizontal delta
        dx: i32,
        /// Vertical delta
        dy: i32,
    },
    /// Button transition
    Button {
        /// Which button
        button: MouseButton,
        /// New state
        state: ButtonState,
    },
    /// Click gesture
    Click(ClickKind),
}

/// Events retained by a [`PointerLog`] unless configured otherwise
pub const DEFAULT_LOG_CAPACITY: usize = 4096;

/// Shared record of the most recent dispatched events
///
/// Oldest events are dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct PointerLog {
    events: Arc<Mutex<VecDeque<PointerEvent>>>,
    capacity: usize,
}

impl Default for PointerLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl PointerLog {
    /// Log retaining at most `capacity` events (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let events = VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY));
        Self {
            events: Arc::new(Mutex::new(events)),
            capacity,
        }
    }

    fn push(&self, event: PointerEvent) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Maximum number of retained events
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of every retained event, oldest first
    pub fn events(&self) -> Vec<PointerEvent> {
        self.events.lock().iter().copied().collect()
    }

    /// Only the absolute moves, in order
    pub fn absolute_moves(&self) -> Vec<(i32, i32)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                PointerEvent::MovedTo { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True if nothing has been dispatched
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

/// Virtual pointer with a fixed-size screen
#[derive(Debug)]
pub struct VirtualPointer {
    width: i32,
    height: i32,
    position: (i32, i32),
    buttons: [bool; 2],
    log: PointerLog,
}

impl VirtualPointer {
    /// Create a pointer at the origin of a `width` × `height` screen
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            position: (0, 0),
            buttons: [false; 2],
            log: PointerLog::default(),
        }
    }

    /// Start at a given position
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = (x, y);
        self
    }

    /// Replace the event log with one retaining `capacity` events
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = PointerLog::with_capacity(capacity);
        self
    }

    /// Handle to this device's event log
    pub fn log(&self) -> PointerLog {
        self.log.clone()
    }

    /// Check if a button is held
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons[Self::button_index(button)]
    }

    fn button_index(button: MouseButton) -> usize {
        match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
        }
    }
}

impl PointerDevice for VirtualPointer {
    fn move_absolute(&mut self, x: i32, y: i32) -> Result<()> {
        self.position = (x, y);
        self.log.push(PointerEvent::MovedTo { x, y });
        trace!("Virtual pointer at ({}, {})", x, y);
        Ok(())
    }

    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.position = (
            self.position.0.saturating_add(dx),
            self.position.1.saturating_add(dy),
        );
        self.log.push(PointerEvent::MovedBy { dx, dy });
        Ok(())
    }

    fn set_button(&mut self, button: MouseButton, state: ButtonState) -> Result<()> {
        self.buttons[Self::button_index(button)] = state == ButtonState::Down;
        self.log.push(PointerEvent::Button { button, state });
        Ok(())
    }

    fn click(&mut self, kind: ClickKind) -> Result<()> {
        self.log.push(PointerEvent::Click(kind));
        Ok(())
    }

    fn screen_size(&mut self) -> Result<(i32, i32)> {
        Ok((self.width, self.height))
    }

    fn position(&mut self) -> Result<(i32, i32)> {
        Ok(self.position)
    }
}
