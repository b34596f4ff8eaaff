//! Motion Pipeline
//!
//! Turns a relative delta from the client into an absolute cursor position.
//!
//! ```text
//! (dx, dy)
//!   └─> StabilizationFilter (optional)  ── suppressed? stop, no platform call
//!       └─> speed scaling (× speed_factor, truncate)
//!           └─> PlatformCursor (one lock held for the rest)
//!               ├─> read current position
//!               ├─> add delta, clamp to screen if enforced
//!               └─> move_absolute
//! ```
//!
//! The current position always comes from the platform, never from the
//! filter's own running estimate, so the pipeline cannot drift away from
//! where the cursor really is (another session, or a local mouse, may have
//! moved it).

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::cursor::{ButtonState, ClickKind, MouseButton, PlatformCursor, FALLBACK_SCREEN_SIZE};
use crate::input::error::{InputError, Result};
use crate::stabilizer::{StabilizationConfig, StabilizationFilter};

/// Speed, bounds and logging settings of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Multiplier applied to every delta (1.0 = unchanged)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,

    /// Keep the cursor inside the screen
    #[serde(default = "default_enforce_bounds")]
    pub enforce_bounds: bool,

    /// Suppress per-event log lines
    #[serde(default)]
    pub silent: bool,

    /// Cached screen width, captured when the pipeline is built
    #[serde(skip)]
    pub screen_width: i32,

    /// Cached screen height, captured when the pipeline is built
    #[serde(skip)]
    pub screen_height: i32,
}

fn default_speed_factor() -> f64 {
    1.0
}
fn default_enforce_bounds() -> bool {
    true
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed_factor: default_speed_factor(),
            enforce_bounds: default_enforce_bounds(),
            silent: false,
            screen_width: 0,
            screen_height: 0,
        }
    }
}

impl MotionConfig {
    fn has_screen(&self) -> bool {
        self.screen_width > 0 && self.screen_height > 0
    }

    fn bounds(&self) -> (i32, i32) {
        if self.has_screen() {
            (self.screen_width, self.screen_height)
        } else {
            FALLBACK_SCREEN_SIZE
        }
    }
}

/// Partial update of a [`MotionConfig`]
///
/// Only fields set to `Some` are applied. A speed factor of exactly zero is
/// never applied: zero speed cannot be configured, and such an update leaves
/// the previous factor in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionConfigUpdate {
    /// New speed factor
    pub speed_factor: Option<f64>,
    /// New bounds enforcement
    pub enforce_bounds: Option<bool>,
    /// New silent flag
    pub silent: Option<bool>,
}

impl MotionConfigUpdate {
    /// Update only the speed factor
    pub fn speed(speed_factor: f64) -> Self {
        Self {
            speed_factor: Some(speed_factor),
            ..Default::default()
        }
    }

    /// Update only bounds enforcement
    pub fn bounds(enforce_bounds: bool) -> Self {
        Self {
            enforce_bounds: Some(enforce_bounds),
            ..Default::default()
        }
    }

    /// Update only the silent flag
    pub fn silent(silent: bool) -> Self {
        Self {
            silent: Some(silent),
            ..Default::default()
        }
    }
}

/// What a move request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The filter swallowed the delta; nothing was dispatched
    Suppressed,
    /// The cursor was moved to this absolute position
    Moved {
        /// Final X
        x: i32,
        /// Final Y
        y: i32,
    },
}

/// Per-session motion controller
#[derive(Debug)]
pub struct MotionPipeline {
    cursor: PlatformCursor,
    config: MotionConfig,
    filter: Option<StabilizationFilter>,
}

impl MotionPipeline {
    /// Create a pipeline and capture the screen size once
    pub fn new(
        cursor: PlatformCursor,
        mut config: MotionConfig,
        stabilization: Option<StabilizationConfig>,
    ) -> Self {
        match cursor.screen_size() {
            Ok((width, height)) => {
                config.screen_width = width;
                config.screen_height = height;
            }
            Err(e) => {
                warn!("Failed to query screen size: {}", e);
            }
        }

        if !config.has_screen() {
            warn!(
                "Screen size unknown, clamping to {}x{} until it can be queried",
                FALLBACK_SCREEN_SIZE.0, FALLBACK_SCREEN_SIZE.1
            );
        }

        Self {
            cursor,
            config,
            filter: stabilization.map(StabilizationFilter::new),
        }
    }

    /// Apply a relative move received now
    pub fn move_by(&mut self, dx: i32, dy: i32) -> Result<MoveOutcome> {
        self.move_by_at(dx, dy, Instant::now())
    }

    /// Apply a relative move received at `now`
    pub fn move_by_at(&mut self, dx: i32, dy: i32, now: Instant) -> Result<MoveOutcome> {
        let (dx, dy) = match self.filter.as_mut() {
            Some(filter) => {
                let out = filter.process(dx, dy, now);
                if !out.should_move {
                    return Ok(MoveOutcome::Suppressed);
                }
                (out.dx, out.dy)
            }
            None => (dx, dy),
        };

        let speed = self.config.speed_factor;
        let adjusted_x = (f64::from(dx) * speed) as i32;
        let adjusted_y = (f64::from(dy) * speed) as i32;

        let enforce_bounds = self.config.enforce_bounds;
        let (width, height) = self.config.bounds();

        let (new_x, new_y) = self.cursor.with_device(|device| {
            let (current_x, current_y) = device.position()?;

            let mut new_x = current_x.saturating_add(adjusted_x);
            let mut new_y = current_y.saturating_add(adjusted_y);

            if enforce_bounds {
                new_x = new_x.clamp(0, (width - 1).max(0));
                new_y = new_y.clamp(0, (height - 1).max(0));
            }

            device.move_absolute(new_x, new_y)?;
            Ok::<_, InputError>((new_x, new_y))
        })?;

        if !self.config.silent {
            info!(
                "Moved mouse to: {},{} (delta: {},{}, adjusted: {},{})",
                new_x, new_y, dx, dy, adjusted_x, adjusted_y
            );
        }

        Ok(MoveOutcome::Moved { x: new_x, y: new_y })
    }

    /// Perform a click named by the client
    ///
    /// Unknown names fail with [`InputError::UnknownClickType`] before any
    /// platform call is made.
    pub fn click(&self, kind: &str) -> Result<()> {
        let Some(kind) = ClickKind::parse(kind) else {
            if !self.config.silent {
                warn!("Unknown click type: {}", kind);
            }
            return Err(InputError::UnknownClickType(kind.to_string()));
        };

        self.cursor.click(kind)?;

        if !self.config.silent {
            info!("Mouse click: {}", kind.as_str());
        }
        Ok(())
    }

    /// Press or release the left button
    pub fn set_left_button(&self, state: ButtonState) -> Result<()> {
        self.set_button(MouseButton::Left, state)
    }

    /// Press or release the right button
    pub fn set_right_button(&self, state: ButtonState) -> Result<()> {
        self.set_button(MouseButton::Right, state)
    }

    fn set_button(&self, button: MouseButton, state: ButtonState) -> Result<()> {
        self.cursor.set_button(button, state)?;

        if !self.config.silent {
            info!("Mouse button {:?} {:?}", button, state);
        }
        Ok(())
    }

    /// Merge a partial update into the current configuration
    pub fn update_config(&mut self, update: MotionConfigUpdate) {
        if let Some(speed) = update.speed_factor {
            if speed != 0.0 {
                self.config.speed_factor = speed;
            } else {
                debug!(
                    "Speed factor 0 cannot be configured, keeping {}",
                    self.config.speed_factor
                );
            }
        }

        if let Some(enforce_bounds) = update.enforce_bounds {
            self.config.enforce_bounds = enforce_bounds;
        }

        if let Some(silent) = update.silent {
            self.config.silent = silent;
        }

        if !self.config.has_screen() {
            if let Ok((width, height)) = self.cursor.screen_size() {
                self.config.screen_width = width;
                self.config.screen_height = height;
            }
        }
    }

    /// Attach a fresh filter built from `config`, or detach with `None`
    pub fn set_stabilization(&mut self, config: Option<StabilizationConfig>) {
        self.filter = config.map(StabilizationFilter::new);
        debug!(
            "Stabilization {}",
            if self.filter.is_some() { "attached" } else { "detached" }
        );
    }

    /// Attach a filter built elsewhere
    pub fn attach_filter(&mut self, filter: StabilizationFilter) {
        self.filter = Some(filter);
    }

    /// Current configuration
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Attached filter, if any
    pub fn filter(&self) -> Option<&StabilizationFilter> {
        self.filter.as_ref()
    }

    /// Shared cursor handle
    pub fn cursor(&self) -> &PlatformCursor {
        &self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{MockPointerDevice, PlatformError, PointerEvent, PointerLog, VirtualPointer};
    use std::time::Duration;

    fn virtual_pipeline(
        x: i32,
        y: i32,
        stabilization: Option<StabilizationConfig>,
    ) -> (MotionPipeline, PointerLog) {
        let pointer = VirtualPointer::new(1920, 1080).with_position(x, y);
        let log = pointer.log();
        let pipeline = MotionPipeline::new(
            PlatformCursor::new(pointer),
            MotionConfig::default(),
            stabilization,
        );
        (pipeline, log)
    }

    #[test]
    fn test_screen_size_captured_at_construction() {
        let (pipeline, _) = virtual_pipeline(0, 0, None);
        assert_eq!(pipeline.config().screen_width, 1920);
        assert_eq!(pipeline.config().screen_height, 1080);
        assert_eq!(pipeline.config().speed_factor, 1.0);
        assert!(pipeline.config().enforce_bounds);
    }

    #[test]
    fn test_move_without_filter() {
        let (mut pipeline, log) = virtual_pipeline(100, 100, None);

        let outcome = pipeline.move_by(5, -7).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved { x: 105, y: 93 });
        assert_eq!(log.absolute_moves(), vec![(105, 93)]);
    }

    #[test]
    fn test_long_move_stream_keeps_log_bounded() {
        let (mut pipeline, log) = virtual_pipeline(960, 540, None);
        pipeline.update_config(MotionConfigUpdate::silent(true));

        for i in 0..200_000 {
            let dx = if i % 2 == 0 { 5 } else { -5 };
            pipeline.move_by(dx, 0).unwrap();
        }

        assert!(log.len() <= crate::cursor::DEFAULT_LOG_CAPACITY);
        assert_eq!(log.absolute_moves().last(), Some(&(960, 540)));
    }

    #[test]
    fn test_bounds_clamp_low_edge() {
        let (mut pipeline, log) = virtual_pipeline(0, 0, None);

        pipeline.move_by(-50, 0).unwrap();
        assert_eq!(log.absolute_moves(), vec![(0, 0)]);
    }

    #[test]
    fn test_bounds_clamp_high_edge() {
        let (mut pipeline, log) = virtual_pipeline(1900, 1070, None);

        pipeline.move_by(100, 100).unwrap();
        assert_eq!(log.absolute_moves(), vec![(1919, 1079)]);
    }

    #[test]
    fn test_bounds_disabled_allows_offscreen() {
        let (mut pipeline, log) = virtual_pipeline(0, 0, None);
        pipeline.update_config(MotionConfigUpdate::bounds(false));

        pipeline.move_by(-50, -1).unwrap();
        assert_eq!(log.absolute_moves(), vec![(-50, -1)]);
    }

    #[test]
    fn test_speed_factor_truncates_toward_zero() {
        let (mut pipeline, log) = virtual_pipeline(500, 500, None);
        pipeline.update_config(MotionConfigUpdate::speed(1.5));

        pipeline.move_by(3, -3).unwrap();
        // 4.5 -> 4, -4.5 -> -4
        assert_eq!(log.absolute_moves(), vec![(504, 496)]);
    }

    #[test]
    fn test_zero_speed_is_ignored() {
        let (mut pipeline, _) = virtual_pipeline(0, 0, None);
        pipeline.update_config(MotionConfigUpdate::speed(2.5));
        pipeline.update_config(MotionConfigUpdate::speed(0.0));
        assert_eq!(pipeline.config().speed_factor, 2.5);
    }

    #[test]
    fn test_boolean_updates_always_overwrite() {
        let (mut pipeline, _) = virtual_pipeline(0, 0, None);

        pipeline.update_config(MotionConfigUpdate {
            speed_factor: None,
            enforce_bounds: Some(false),
            silent: Some(true),
        });
        assert!(!pipeline.config().enforce_bounds);
        assert!(pipeline.config().silent);

        pipeline.update_config(MotionConfigUpdate::bounds(true));
        assert!(pipeline.config().enforce_bounds);
        assert!(pipeline.config().silent);
    }

    #[test]
    fn test_suppressed_move_makes_no_platform_call() {
        let mut device = MockPointerDevice::new();
        device.expect_screen_size().times(1).returning(|| Ok((800, 600)));
        device.expect_position().never();
        device.expect_move_absolute().never();

        let mut pipeline = MotionPipeline::new(
            PlatformCursor::new(device),
            MotionConfig::default(),
            Some(StabilizationConfig::default()),
        );

        let outcome = pipeline.move_by(1, 1).unwrap();
        assert_eq!(outcome, MoveOutcome::Suppressed);
    }

    #[test]
    fn test_filter_runs_before_scaling() {
        let t0 = Instant::now();
        let config = StabilizationConfig {
            dead_zone: 3,
            smoothing_level: 0.0,
            jiggle_filter: false,
            anti_drift: false,
            history_depth: 5,
        };
        let (mut pipeline, log) = virtual_pipeline(100, 100, None);
        pipeline.attach_filter(StabilizationFilter::with_start(config, t0));
        pipeline.update_config(MotionConfigUpdate::speed(2.0));

        // x falls inside the dead zone before it is doubled
        pipeline
            .move_by_at(2, 4, t0 + Duration::from_millis(10))
            .unwrap();
        assert_eq!(log.absolute_moves(), vec![(100, 108)]);
    }

    #[test]
    fn test_unknown_click_makes_no_platform_call() {
        let mut device = MockPointerDevice::new();
        device.expect_screen_size().returning(|| Ok((800, 600)));
        device.expect_click().never();

        let pipeline =
            MotionPipeline::new(PlatformCursor::new(device), MotionConfig::default(), None);

        match pipeline.click("middle") {
            Err(InputError::UnknownClickType(kind)) => assert_eq!(kind, "middle"),
            other => panic!("Expected UnknownClickType, got {:?}", other),
        }
    }

    #[test]
    fn test_known_clicks_dispatch() {
        let (pipeline, log) = virtual_pipeline(0, 0, None);

        pipeline.click("left").unwrap();
        pipeline.click("right").unwrap();
        pipeline.click("double").unwrap();

        assert_eq!(
            log.events(),
            vec![
                PointerEvent::Click(ClickKind::Left),
                PointerEvent::Click(ClickKind::Right),
                PointerEvent::Click(ClickKind::Double),
            ]
        );
    }

    #[test]
    fn test_buttons_dispatch() {
        let (pipeline, log) = virtual_pipeline(0, 0, None);

        pipeline.set_left_button(ButtonState::Down).unwrap();
        pipeline.set_right_button(ButtonState::Up).unwrap();

        assert_eq!(
            log.events(),
            vec![
                PointerEvent::Button {
                    button: MouseButton::Left,
                    state: ButtonState::Down
                },
                PointerEvent::Button {
                    button: MouseButton::Right,
                    state: ButtonState::Up
                },
            ]
        );
    }

    #[test]
    fn test_platform_failure_is_recoverable() {
        let mut device = MockPointerDevice::new();
        device.expect_screen_size().returning(|| Ok((800, 600)));
        let mut calls = 0;
        device.expect_position().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(PlatformError::Unavailable("display gone".to_string()))
            } else {
                Ok((10, 10))
            }
        });
        device.expect_move_absolute().times(1).returning(|_, _| Ok(()));

        let mut pipeline =
            MotionPipeline::new(PlatformCursor::new(device), MotionConfig::default(), None);

        assert!(matches!(
            pipeline.move_by(5, 5),
            Err(InputError::Platform(PlatformError::Unavailable(_)))
        ));
        assert_eq!(
            pipeline.move_by(5, 5).unwrap(),
            MoveOutcome::Moved { x: 15, y: 15 }
        );
    }

    #[test]
    fn test_unknown_screen_size_is_requeried_on_update() {
        let mut device = MockPointerDevice::new();
        let mut calls = 0;
        device.expect_screen_size().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(PlatformError::Unavailable("starting".to_string()))
            } else {
                Ok((1280, 720))
            }
        });

        let mut pipeline =
            MotionPipeline::new(PlatformCursor::new(device), MotionConfig::default(), None);
        assert_eq!(pipeline.config().screen_width, 0);

        pipeline.update_config(MotionConfigUpdate::silent(true));
        assert_eq!(pipeline.config().screen_width, 1280);
        assert_eq!(pipeline.config().screen_height, 720);
    }

    #[test]
    fn test_set_stabilization_replaces_filter() {
        let (mut pipeline, _) = virtual_pipeline(0, 0, Some(StabilizationConfig::default()));
        assert!(pipeline.filter().is_some());

        let mut config = StabilizationConfig::default();
        config.dead_zone = 9;
        pipeline.set_stabilization(Some(config));
        assert_eq!(pipeline.filter().unwrap().config().dead_zone, 9);

        pipeline.set_stabilization(None);
        assert!(pipeline.filter().is_none());
    }
}
