//! Client Sessions
//!
//! One session per connected client. A session turns the client's frames into
//! pointer operations and keeps all per-client state to itself.
//!
//! # Overview
//!
//! Sessions are isolated: speed, bounds, silent mode and the whole
//! stabilization filter (history, velocity, idle clock) belong to a single
//! connection and vanish with it. Two things are shared:
//!
//! - the [`PlatformCursor`], serialized behind its own lock
//! - the [`ConnectionTracker`], counted atomically and released by guard drop
//!
//! # Architecture
//!
//! ```text
//! SessionContext (cloned per connection)
//!   ├─> PlatformCursor ─────────┐ shared
//!   ├─> ConnectionTracker ──────┘
//!   └─> SessionSettings (initial motion + stabilization)
//!
//! Session
//!   ├─> MotionPipeline
//!   │     └─> StabilizationFilter (optional)
//!   ├─> pending StabilizationConfig
//!   └─> ConnectionGuard
//! ```
//!
//! # Failure Handling
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Unparseable frame | dropped, logged when verbose |
//! | Unknown click kind | reported, no platform call |
//! | Platform error | reported, session continues |
//! | Stream error / close | loop ends, slot released |
//!
//! # Usage
//!
//! ```rust,no_run
//! use remote_pointer_server::cursor::{PlatformCursor, VirtualPointer};
//! use remote_pointer_server::session::{ConnectionTracker, Session, SessionContext, SessionSettings};
//!
//! # async fn example() {
//! let context = SessionContext::new(
//!     PlatformCursor::new(VirtualPointer::new(1920, 1080)),
//!     ConnectionTracker::new(),
//!     SessionSettings::default(),
//! );
//!
//! let guard = context.tracker.acquire();
//! let session = Session::new(context, guard, "127.0.0.1:50000");
//! let frames = futures::stream::iter(vec![Ok::<_, String>("5,0".to_string())]);
//! let end = session.run(frames).await;
//! # }
//! ```

mod handler;
mod tracker;

pub use handler::{Session, SessionEnd};
pub use tracker::{ConnectionGuard, ConnectionTracker};

use crate::config::Config;
use crate::cursor::PlatformCursor;
use crate::input::MotionConfig;
use crate::stabilizer::StabilizationConfig;

/// Initial settings every new session starts from
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Speed, bounds and silent mode
    pub motion: MotionConfig,
    /// Stabilization parameters (also the pending config)
    pub stabilization: StabilizationConfig,
    /// Attach a filter when the session starts
    pub stabilization_enabled: bool,
    /// Log connection lifecycle and rejected frames
    pub verbose: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            stabilization: StabilizationConfig::default(),
            stabilization_enabled: true,
            verbose: true,
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            motion: config.motion.clone(),
            stabilization: config.stabilization.filter.clone(),
            stabilization_enabled: config.stabilization.enabled,
            verbose: config.server.verbose,
        }
    }
}

/// Everything a new session needs from the process
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Shared cursor
    pub cursor: PlatformCursor,
    /// Shared connection counter
    pub tracker: ConnectionTracker,
    /// Starting settings
    pub settings: SessionSettings,
}

impl SessionContext {
    /// Bundle the shared services with starting settings
    pub fn new(cursor: PlatformCursor, tracker: ConnectionTracker, settings: SessionSettings) -> Self {
        Self {
            cursor,
            tracker,
            settings,
        }
    }
}
