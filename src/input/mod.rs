//! Pointer Input Handling
//!
//! Executes commands from remote clients against the shared cursor.
//!
//! # Architecture
//!
//! ```text
//! Command (from protocol)
//!       ↓
//! ┌─────────────────────────┐
//! │  MotionPipeline         │ ← one per session
//! │  - move / click / button│
//! │  - speed, bounds, silent│
//! └─────────────────────────┘
//!       ↓               ↓
//! ┌──────────────┐ ┌────────────────┐
//! │ Stabilization│ │ PlatformCursor │ ← one per process
//! │ Filter       │ │ (serialized)   │
//! └──────────────┘ └────────────────┘
//! ```
//!
//! # Error Handling
//!
//! Operations return `Result<T, InputError>`. Use [`recovery_action`] to decide
//! what a failure means for the session: everything except a dead transport is
//! recoverable, and the pipeline stays valid after any error.
//!
//! ```rust,no_run
//! use remote_pointer_server::input::{recovery_action, MotionPipeline, RecoveryAction};
//!
//! # fn example(pipeline: &MotionPipeline) {
//! if let Err(e) = pipeline.click("middle") {
//!     if recovery_action(&e) == RecoveryAction::Report {
//!         eprintln!("Click rejected: {}", e);
//!     }
//! }
//! # }
//! ```

pub mod error;
pub mod pipeline;

pub use error::{classify_error, recovery_action, ErrorType, InputError, RecoveryAction, Result};
pub use pipeline::{MotionConfig, MotionConfigUpdate, MotionPipeline, MoveOutcome};
pub use self_test::{run_self_test, SelfTestOptions, SelfTestReport};
