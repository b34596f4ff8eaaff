//! Motion History Ring
//!
//! Fixed-capacity window of the most recent accepted deltas. The capacity is
//! chosen once at construction and never changes; the write cursor wraps with
//! modulo arithmetic so the window always holds the last `capacity` samples
//! (unwritten slots read as zero motion).

use std::time::Instant;

/// One delta recorded in the history window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Horizontal delta (pixels)
    pub dx: i32,
    /// Vertical delta (pixels)
    pub dy: i32,
    /// Time the delta was received
    pub timestamp: Instant,
    /// Instantaneous velocity at this sample (pixels/second)
    pub velocity: (f64, f64),
}

/// Aggregate over the whole history window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowSummary {
    /// Signed sum of horizontal deltas
    pub sum_x: i64,
    /// Signed sum of vertical deltas
    pub sum_y: i64,
    /// `|sum_x| + |sum_y|`
    pub net: f64,
    /// `Σ|dx| + Σ|dy|`
    pub total: f64,
}

impl WindowSummary {
    /// Net displacement over total absolute magnitude.
    ///
    /// Low values mean the window is mostly back-and-forth motion. Returns 0
    /// when the window carries no motion at all.
    pub fn coherence(&self) -> f64 {
        if self.total > 0.0 {
            self.net / self.total
        } else {
            0.0
        }
    }
}

/// Fixed-capacity ring of motion samples
#[derive(Debug, Clone)]
pub struct MotionHistory {
    slots: Box<[Option<MotionSample>]>,
    cursor: usize,
}

impl MotionHistory {
    /// Create a history with room for `capacity` samples.
    ///
    /// A capacity of zero is raised to one so the ring index stays valid.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Number of slots in the window
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index the next sample will be written to
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Write a sample at the cursor and advance it
    pub fn push(&mut self, sample: MotionSample) {
        self.slots[self.cursor] = Some(sample);
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    /// Iterate over the samples written so far (oldest slot order not guaranteed)
    pub fn samples(&self) -> impl Iterator<Item = &MotionSample> {
        self.slots.iter().flatten()
    }

    /// Number of slots that hold a sample
    pub fn len(&self) -> usize {
        self.samples().count()
    }

    /// True if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Sum the window. Empty slots count as zero motion.
    pub fn summarize(&self) -> WindowSummary {
        let mut summary = WindowSummary::default();
        for sample in self.samples() {
            summary.sum_x += i64::from(sample.dx);
            summary.sum_y += i64::from(sample.dy);
            summary.total += f64::from(sample.dx).abs() + f64::from(sample.dy).abs();
        }
        summary.net = (summary.sum_x as f64).abs() + (summary.sum_y as f64).abs();
        summary
    }

    /// Drop every recorded sample
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.cursor = 0;
    }
}
