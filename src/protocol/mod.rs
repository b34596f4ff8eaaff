//! Command Protocol
//!
//! Parses the text frames remote clients send into typed [`Command`]s.
//!
//! # Overview
//!
//! Every frame is one command. There is no response channel: clients fire and
//! forget, and a frame that fails to parse is simply dropped.
//!
//! | Frame | Command |
//! |-------|---------|
//! | `"<dx>,<dy>"` | [`Command::Move`] |
//! | `"click:<kind>"` | [`Command::Click`] |
//! | `"leftbutton:down"` / `"leftbutton:up"` | [`Command::LeftButton`] |
//! | `"rightbutton:down"` / `"rightbutton:up"` | [`Command::RightButton`] |
//! | `"config:<key>=<value>"` | [`Command::Config`] |
//! | `"stabilize:<key>=<value>"` | [`Command::Stabilize`] |
//!
//! ## Values
//!
//! - Integers are base-10 with an optional sign, no whitespace.
//! - Floats must be finite.
//! - Booleans accept `1 t T TRUE true True` and `0 f F FALSE false False`.
//!
//! The click kind is passed through unparsed; rejecting unknown kinds is the
//! pipeline's job so the rejection can be reported as such.

use std::str::FromStr;
use thiserror::Error;

use crate::cursor::ButtonState;

/// Result type for protocol parsing
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Protocol error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame was empty
    #[error("Empty frame")]
    Empty,

    /// Frame did not have the expected shape
    #[error("Invalid frame format: {0:?}")]
    InvalidFormat(String),

    /// A value could not be parsed
    #[error("Invalid {kind} value for {field}: {value:?}")]
    InvalidValue {
        /// Field the value belongs to
        field: &'static str,
        /// Expected value type
        kind: &'static str,
        /// Raw text received
        value: String,
    },

    /// Button state other than `down` / `up`
    #[error("Invalid button state: {0:?}")]
    InvalidButtonState(String),

    /// Key not known in its namespace
    #[error("Unknown key: {0:?}")]
    UnknownKey(String),
}

/// Pipeline configuration change (`config:` namespace)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigCommand {
    /// `config:speed=<float>`
    Speed(f64),
    /// `config:bounds=<bool>`
    Bounds(bool),
    /// `config:silent=<bool>`
    Silent(bool),
}

/// Stabilization change (`stabilize:` namespace)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilizeCommand {
    /// `stabilize:deadzone=<int>`
    DeadZone(u32),
    /// `stabilize:smoothing=<float>`
    Smoothing(f64),
    /// `stabilize:jiggle=<bool>`
    Jiggle(bool),
    /// `stabilize:drift=<bool>`
    Drift(bool),
    /// `stabilize:enable=<bool>`
    Enable(bool),
}

/// One parsed client command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Relative pointer movement
    Move {
        /// Horizontal delta
        dx: i32,
        /// Vertical delta
        dy: i32,
    },
    /// Click gesture, kind as sent by the client
    Click(String),
    /// Left button transition
    LeftButton(ButtonState),
    /// Right button transition
    RightButton(ButtonState),
    /// Pipeline configuration change
    Config(ConfigCommand),
    /// Stabilization change
    Stabilize(StabilizeCommand),
}

impl Command {
    /// Parse one text frame
    pub fn parse(frame: &str) -> Result<Self> {
        if frame.is_empty() {
            return Err(ProtocolError::Empty);
        }

        if let Some(kind) = frame.strip_prefix("click:") {
            return Ok(Command::Click(kind.to_string()));
        }

        if let Some(state) = frame.strip_prefix("leftbutton:") {
            return parse_button_state(state).map(Command::LeftButton);
        }

        if let Some(state) = frame.strip_prefix("rightbutton:") {
            return parse_button_state(state).map(Command::RightButton);
        }

        if let Some(rest) = frame.strip_prefix("config:") {
            return parse_config(rest).map(Command::Config);
        }

        if let Some(rest) = frame.strip_prefix("stabilize:") {
            return parse_stabilize(rest).map(Command::Stabilize);
        }

        parse_move(frame)
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Command::parse(s)
    }
}

fn parse_move(frame: &str) -> Result<Command> {
    let mut parts = frame.split(',');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ProtocolError::InvalidFormat(frame.to_string()));
    };

    Ok(Command::Move {
        dx: parse_int("x delta", x)?,
        dy: parse_int("y delta", y)?,
    })
}

fn parse_button_state(state: &str) -> Result<ButtonState> {
    ButtonState::parse(state).ok_or_else(|| ProtocolError::InvalidButtonState(state.to_string()))
}

fn split_key_value(command: &str) -> Result<(&str, &str)> {
    let mut parts = command.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Ok((key, value)),
        _ => Err(ProtocolError::InvalidFormat(command.to_string())),
    }
}

fn parse_config(command: &str) -> Result<ConfigCommand> {
    let (key, value) = split_key_value(command)?;
    match key {
        "speed" => Ok(ConfigCommand::Speed(parse_float("speed", value)?)),
        "bounds" => Ok(ConfigCommand::Bounds(parse_bool("bounds", value)?)),
        "silent" => Ok(ConfigCommand::Silent(parse_bool("silent", value)?)),
        _ => Err(ProtocolError::UnknownKey(key.to_string())),
    }
}

fn parse_stabilize(command: &str) -> Result<StabilizeCommand> {
    let (key, value) = split_key_value(command)?;
    match key {
        "deadzone" => Ok(StabilizeCommand::DeadZone(
            value.parse().map_err(|_| ProtocolError::InvalidValue {
                field: "deadzone",
                kind: "non-negative integer",
                value: value.to_string(),
            })?,
        )),
        "smoothing" => Ok(StabilizeCommand::Smoothing(parse_float("smoothing", value)?)),
        "jiggle" => Ok(StabilizeCommand::Jiggle(parse_bool("jiggle", value)?)),
        "drift" => Ok(StabilizeCommand::Drift(parse_bool("drift", value)?)),
        "enable" => Ok(StabilizeCommand::Enable(parse_bool("enable", value)?)),
        _ => Err(ProtocolError::UnknownKey(key.to_string())),
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i32> {
    value.parse().map_err(|_| ProtocolError::InvalidValue {
        field,
        kind: "integer",
        value: value.to_string(),
    })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ProtocolError::InvalidValue {
            field,
            kind: "float",
            value: value.to_string(),
        }),
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ProtocolError::InvalidValue {
            field,
            kind: "bool",
            value: value.to_string(),
        }),
    }
}
