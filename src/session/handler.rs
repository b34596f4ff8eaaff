//! Per-connection command handling

use futures::{pin_mut, Stream, StreamExt};
use std::fmt::Display;
use tracing::{debug, info, warn};

use super::tracker::ConnectionGuard;
use super::{SessionContext, SessionSettings};
use crate::input::{recovery_action, InputError, MotionConfigUpdate, MotionPipeline, RecoveryAction};
use crate::protocol::{Command, ConfigCommand, StabilizeCommand};
use crate::stabilizer::StabilizationConfig;

/// Why a session loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Client closed the stream
    ClientClosed,
    /// Stream failed; carries the transport's message
    TransportTerminated(String),
}

impl From<InputError> for SessionEnd {
    fn from(error: InputError) -> Self {
        match error {
            InputError::TransportTerminated(reason) => SessionEnd::TransportTerminated(reason),
            other => SessionEnd::TransportTerminated(other.to_string()),
        }
    }
}

/// One client's isolated command processor
///
/// Owns its pipeline and filter. The only things shared with other sessions
/// are the platform cursor and the connection counter.
#[derive(Debug)]
pub struct Session {
    pipeline: MotionPipeline,
    pending: StabilizationConfig,
    verbose: bool,
    peer: String,
    guard: ConnectionGuard,
    context: SessionContext,
}

impl Session {
    /// Start a session holding `guard` for its whole lifetime
    pub fn new(context: SessionContext, guard: ConnectionGuard, peer: impl Into<String>) -> Self {
        let SessionSettings {
            motion,
            stabilization,
            stabilization_enabled,
            verbose,
        } = context.settings.clone();

        let pipeline = MotionPipeline::new(
            context.cursor.clone(),
            motion,
            stabilization_enabled.then(|| stabilization.clone()),
        );

        let session = Self {
            pipeline,
            pending: stabilization,
            verbose,
            peer: peer.into(),
            guard,
            context,
        };

        if session.verbose {
            info!(
                "New connection #{} established from {} (active: {})",
                session.guard.id(),
                session.peer,
                session.context.tracker.active()
            );
        }
        session
    }

    /// Sequential connection number
    pub fn id(&self) -> u64 {
        self.guard.id()
    }

    /// The session's motion pipeline
    pub fn pipeline(&self) -> &MotionPipeline {
        &self.pipeline
    }

    /// Stabilization settings used the next time a filter is attached
    pub fn pending_stabilization(&self) -> &StabilizationConfig {
        &self.pending
    }

    /// Parse and execute one frame
    pub fn handle_frame(&mut self, frame: &str) -> Result<(), InputError> {
        let command = Command::parse(frame)?;
        self.execute(command)
    }

    /// Execute one parsed command
    pub fn execute(&mut self, command: Command) -> Result<(), InputError> {
        match command {
            Command::Move { dx, dy } => self.pipeline.move_by(dx, dy).map(|_| ()),
            Command::Click(kind) => self.pipeline.click(&kind),
            Command::LeftButton(state) => self.pipeline.set_left_button(state),
            Command::RightButton(state) => self.pipeline.set_right_button(state),
            Command::Config(setting) => {
                self.apply_config(setting);
                Ok(())
            }
            Command::Stabilize(setting) => {
                self.apply_stabilize(setting);
                Ok(())
            }
        }
    }

    fn apply_config(&mut self, setting: ConfigCommand) {
        let update = match setting {
            ConfigCommand::Speed(speed) => MotionConfigUpdate::speed(speed),
            ConfigCommand::Bounds(bounds) => MotionConfigUpdate::bounds(bounds),
            ConfigCommand::Silent(silent) => MotionConfigUpdate::silent(silent),
        };
        self.pipeline.update_config(update);

        if self.verbose {
            match setting {
                ConfigCommand::Speed(_) => info!(
                    "Mouse speed set to {:.2}",
                    self.pipeline.config().speed_factor
                ),
                ConfigCommand::Bounds(bounds) => info!("Enforce bounds set to {}", bounds),
                ConfigCommand::Silent(silent) => info!("Silent mode set to {}", silent),
            }
        }
    }

    fn apply_stabilize(&mut self, setting: StabilizeCommand) {
        match setting {
            StabilizeCommand::DeadZone(value) => self.pending.dead_zone = value,
            StabilizeCommand::Smoothing(value) => self.pending.smoothing_level = value,
            StabilizeCommand::Jiggle(value) => self.pending.jiggle_filter = value,
            StabilizeCommand::Drift(value) => self.pending.anti_drift = value,
            StabilizeCommand::Enable(enabled) => {
                self.pipeline
                    .set_stabilization(enabled.then(|| self.pending.clone()));
                if self.verbose {
                    info!(
                        "Stabilization {}",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
                return;
            }
        }

        // Settings take effect at once on an attached filter
        if self.pipeline.filter().is_some() {
            self.pipeline.set_stabilization(Some(self.pending.clone()));
        }

        if self.verbose {
            info!("Stabilization updated: {:?}", setting);
        }
    }

    /// Handle one frame and log the failure, if any
    ///
    /// Returns `false` when the failure ends the session.
    pub fn dispatch(&mut self, frame: &str) -> bool {
        match self.handle_frame(frame) {
            Ok(()) => true,
            Err(error) => self.recover(Some(frame), &error),
        }
    }

    fn recover(&self, frame: Option<&str>, error: &InputError) -> bool {
        match recovery_action(error) {
            RecoveryAction::Skip => {
                let frame = frame.unwrap_or_default();
                if self.verbose {
                    warn!("Dropping frame {:?}: {}", frame, error);
                } else {
                    debug!("Dropping frame {:?}: {}", frame, error);
                }
                true
            }
            RecoveryAction::Report => {
                warn!("Command failed on connection #{}: {}", self.id(), error);
                true
            }
            RecoveryAction::EndSession => {
                warn!("Connection #{} error: {}", self.id(), error);
                false
            }
        }
    }

    /// Drive the session until the frame stream ends
    ///
    /// The connection slot is released when this returns.
    pub async fn run<S, E>(mut self, frames: S) -> SessionEnd
    where
        S: Stream<Item = std::result::Result<String, E>>,
        E: Display,
    {
        pin_mut!(frames);

        let end = loop {
            let (frame, error) = match frames.next().await {
                None => break SessionEnd::ClientClosed,
                Some(Ok(frame)) => match self.handle_frame(&frame) {
                    Ok(()) => continue,
                    Err(error) => (Some(frame), error),
                },
                Some(Err(e)) => (None, InputError::TransportTerminated(e.to_string())),
            };

            if !self.recover(frame.as_deref(), &error) {
                break SessionEnd::from(error);
            }
        };

        self.close(&end);
        end
    }

    fn close(self, end: &SessionEnd) {
        let Session {
            guard,
            context,
            peer,
            verbose,
            ..
        } = self;
        let id = guard.id();
        drop(guard);

        if verbose {
            info!(
                "Connection #{} closed from {} ({:?}, active: {})",
                id,
                peer,
                end,
                context.tracker.active()
            );
        }
    }
}
