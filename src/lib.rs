//! # remote-pointer-server
//!
//! Drives the local cursor from relative motion sent by a remote client,
//! typically a phone streaming gyroscope or touch deltas over WebSocket.
//!
//! # Architecture
//!
//! ```text
//! remote-pointer-server
//!   ├─> Server (axum: /ws upgrade, /health)
//!   │     └─> Session (one per connection)
//!   │           ├─> Protocol (text frame → Command)
//!   │           └─> MotionPipeline
//!   │                 ├─> StabilizationFilter (dead zone, jiggle, smoothing, drift)
//!   │                 └─> speed scaling + bounds clamping
//!   └─> PlatformCursor (process-wide, serialized)
//!         └─> PointerDevice backend (virtual)
//! ```
//!
//! # Data Flow
//!
//! **Motion Path:** Client → `"dx,dy"` frame → Session → Filter → Pipeline → Cursor
//!
//! **Control Path:** Client → `config:` / `stabilize:` frame → Session → Pipeline settings

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Server configuration
pub mod config;

/// Platform cursor and pointer backends
pub mod cursor;

/// Command execution against the cursor
pub mod input;

/// Client frame parsing
pub mod protocol;

/// HTTP and WebSocket server
pub mod server;

/// Per-connection sessions
pub mod session;

/// Motion stabilization filter
///
/// Removes sensor noise, tremor and post-idle drift from relative deltas
/// before they reach the cursor. Each session owns at most one filter and
/// replaces it whenever a setting changes.
pub mod stabilizer;

/// Utility functions
pub mod utils;
