//! Stabilization Filter
//!
//! Turns raw relative deltas from a hand-held sensor into deltas that are
//! safe to apply to a cursor. The stages always run in this order:
//!
//! ```text
//! raw delta
//!   └─> dead zone        (per-axis noise floor)
//!       └─> jiggle       (oscillation over the history window)
//!           └─> smoothing (exponential velocity blend)
//!               └─> anti-drift (fresh gesture after idle)
//!                   └─> filtered delta + should_move
//! ```
//!
//! # Smoothing
//!
//! The filter keeps a velocity estimate and blends each new sample into it:
//!
//! ```text
//! velocity = velocity * s + (delta / elapsed) * (1 - s)
//! delta    = trunc(velocity * elapsed)
//! ```
//!
//! where `s` is the smoothing level in `[0, 1]` and `elapsed` is the time
//! since the previous accepted move. Higher `s` means more lag and less noise.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::trace;

use super::history::{MotionHistory, MotionSample};

/// Windows whose coherence falls below this are treated as oscillation
pub const JIGGLE_COHERENCE_THRESHOLD: f64 = 0.3;

/// Idle period after which the next move starts a fresh gesture
pub const DRIFT_IDLE_THRESHOLD: Duration = Duration::from_millis(2000);

/// Configuration for a stabilization filter
///
/// Immutable once handed to a [`StabilizationFilter`]; changing any field
/// means building a new filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizationConfig {
    /// Per-axis deltas smaller than this are discarded (pixels)
    #[serde(default = "default_dead_zone")]
    pub dead_zone: u32,

    /// Velocity smoothing (0.0 = off, 1.0 = frozen)
    #[serde(default = "default_smoothing_level")]
    pub smoothing_level: f64,

    /// Collapse oscillating motion onto its dominant axis
    #[serde(default = "default_true")]
    pub jiggle_filter: bool,

    /// Reset velocity and swallow small moves after an idle period
    #[serde(default = "default_true")]
    pub anti_drift: bool,

    /// Number of samples in the jiggle window
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

fn default_dead_zone() -> u32 {
    2
}
fn default_smoothing_level() -> f64 {
    0.3
}
fn default_true() -> bool {
    true
}
fn default_history_depth() -> usize {
    5
}

impl Default for StabilizationConfig {
    fn default() -> Self {
        Self {
            dead_zone: default_dead_zone(),
            smoothing_level: default_smoothing_level(),
            jiggle_filter: true,
            anti_drift: true,
            history_depth: default_history_depth(),
        }
    }
}

impl StabilizationConfig {
    /// Copy with the smoothing level forced into `[0, 1]` and a non-zero depth
    pub fn sanitized(mut self) -> Self {
        self.smoothing_level = if self.smoothing_level.is_nan() {
            0.0
        } else {
            self.smoothing_level.clamp(0.0, 1.0)
        };
        self.history_depth = self.history_depth.max(1);
        self
    }
}

/// Result of running one delta through the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutput {
    /// Filtered horizontal delta
    pub dx: i32,
    /// Filtered vertical delta
    pub dy: i32,
    /// False when the move should be dropped entirely
    pub should_move: bool,
}

impl FilterOutput {
    fn suppressed() -> Self {
        Self {
            dx: 0,
            dy: 0,
            should_move: false,
        }
    }
}

/// Per-session motion stabilizer
#[derive(Debug, Clone)]
pub struct StabilizationFilter {
    config: StabilizationConfig,

    /// Time of the last accepted move
    last_move: Instant,

    /// Smoothed velocity (pixels/second)
    velocity: (f64, f64),

    /// Jiggle window
    history: MotionHistory,

    /// Cumulative filtered displacement. Diagnostic only.
    position: (i64, i64),
}

impl StabilizationFilter {
    /// Create a filter whose idle clock starts now
    pub fn new(config: StabilizationConfig) -> Self {
        Self::with_start(config, Instant::now())
    }

    /// Create a filter whose idle clock starts at `start`
    pub fn with_start(config: StabilizationConfig, start: Instant) -> Self {
        let config = config.sanitized();
        Self {
            history: MotionHistory::new(config.history_depth),
            config,
            last_move: start,
            velocity: (0.0, 0.0),
            position: (0, 0),
        }
    }

    /// Run one raw delta received at `now` through every stage
    pub fn process(&mut self, dx: i32, dy: i32, now: Instant) -> FilterOutput {
        let dead_zone = i64::from(self.config.dead_zone);

        let mut dx = if i64::from(dx).abs() < dead_zone { 0 } else { dx };
        let mut dy = if i64::from(dy).abs() < dead_zone { 0 } else { dy };

        // Nothing left after the dead zone: leave all state untouched
        if dx == 0 && dy == 0 {
            return FilterOutput::suppressed();
        }

        let since_last = now.saturating_duration_since(self.last_move);
        let elapsed = since_last.as_secs_f64();

        if self.config.jiggle_filter {
            (dx, dy) = self.apply_jiggle_filter(dx, dy, now, elapsed);
        }

        if self.config.smoothing_level > 0.0 && elapsed > 0.0 {
            (dx, dy) = self.apply_smoothing(dx, dy, elapsed);
        }

        if self.config.anti_drift && since_last.as_millis() > DRIFT_IDLE_THRESHOLD.as_millis() {
            self.last_move = now;
            self.velocity = (0.0, 0.0);

            let limit = dead_zone * 2;
            if i64::from(dx).abs() <= limit && i64::from(dy).abs() <= limit {
                trace!(
                    "Drift reset after {:?} idle, swallowing ({}, {})",
                    since_last,
                    dx,
                    dy
                );
                return FilterOutput::suppressed();
            }
        }

        self.last_move = now;
        self.position.0 += i64::from(dx);
        self.position.1 += i64::from(dy);

        FilterOutput {
            dx,
            dy,
            should_move: true,
        }
    }

    fn apply_jiggle_filter(&mut self, dx: i32, dy: i32, now: Instant, elapsed: f64) -> (i32, i32) {
        let velocity = if elapsed > 0.0 {
            (f64::from(dx) / elapsed, f64::from(dy) / elapsed)
        } else {
            (0.0, 0.0)
        };

        self.history.push(MotionSample {
            dx,
            dy,
            timestamp: now,
            velocity,
        });

        let window = self.history.summarize();
        let depth = self.history.capacity() as f64;
        let coherence = window.coherence();

        let oscillating = window.total > 0.0
            && coherence < JIGGLE_COHERENCE_THRESHOLD
            && window.total > f64::from(self.config.dead_zone) * depth;

        if !oscillating {
            return (dx, dy);
        }

        trace!(
            "Jiggle detected: coherence={:.3}, sum=({}, {}), total={}",
            coherence,
            window.sum_x,
            window.sum_y,
            window.total
        );

        // X wins on an exact tie
        if window.sum_x.abs() >= window.sum_y.abs() {
            ((window.sum_x as f64 / depth) as i32, 0)
        } else {
            (0, (window.sum_y as f64 / depth) as i32)
        }
    }

    fn apply_smoothing(&mut self, dx: i32, dy: i32, elapsed: f64) -> (i32, i32) {
        let s = self.config.smoothing_level;

        let instant_x = f64::from(dx) / elapsed;
        let instant_y = f64::from(dy) / elapsed;

        self.velocity.0 = self.velocity.0 * s + instant_x * (1.0 - s);
        self.velocity.1 = self.velocity.1 * s + instant_y * (1.0 - s);

        (
            (self.velocity.0 * elapsed) as i32,
            (self.velocity.1 * elapsed) as i32,
        )
    }

    /// Configuration this filter was built with
    pub fn config(&self) -> &StabilizationConfig {
        &self.config
    }

    /// Time of the last accepted (or drift-reset) move
    pub fn last_move(&self) -> Instant {
        self.last_move
    }

    /// Current smoothed velocity (pixels/second)
    pub fn velocity(&self) -> (f64, f64) {
        self.velocity
    }

    /// Jiggle window
    pub fn history(&self) -> &MotionHistory {
        &self.history
    }

    /// Cumulative filtered displacement since construction
    pub fn position(&self) -> (i64, i64) {
        self.position
    }
}
