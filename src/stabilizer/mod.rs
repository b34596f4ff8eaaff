//! Motion stabilization
//!
//! Hand-held pointing (gyroscope, touch drag) produces deltas that are noisy
//! at rest, oscillate when the hand trembles, and drift after a pause. This
//! module filters those deltas before they reach the cursor.
//!
//! # Stages
//!
//! | Stage | Removes | State touched |
//! |-------|---------|---------------|
//! | Dead zone | sensor noise below N px | none |
//! | Jiggle | back-and-forth tremor | history window |
//! | Smoothing | sample-to-sample spikes | velocity |
//! | Anti-drift | jump on first move after idle | velocity, idle clock |
//!
//! # Architecture
//!
//! ```text
//! Session
//!   └─> MotionPipeline
//!       └─> StabilizationFilter (optional, one per session)
//!           ├─> MotionHistory (fixed-capacity ring)
//!           └─> velocity / idle clock
//! ```
//!
//! A filter is never patched in place. Changing any setting builds a fresh
//! filter from a new [`StabilizationConfig`], which also discards the old
//! history and velocity.

mod filter;
mod history;

pub use filter::{
    FilterOutput, StabilizationConfig, StabilizationFilter, DRIFT_IDLE_THRESHOLD,
    JIGGLE_COHERENCE_THRESHOLD,
};
pub use history::{MotionHistory, MotionSample, WindowSummary};
