//! Input Handling Error Types
//!
//! Every failure a session can hit while handling one command. None of these
//! invalidate the pipeline or filter state; the only session-ending failure is
//! the transport going away.

use thiserror::Error;

use crate::cursor::PlatformError;
use crate::protocol::ProtocolError;

/// Result type for input operations
pub type Result<T> = std::result::Result<T, InputError>;

/// Input module error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Frame could not be parsed into a command
    #[error("Malformed command: {0}")]
    MalformedCommand(#[from] ProtocolError),

    /// Click kind outside `left`, `right`, `double`
    #[error("Unknown click type: {0}")]
    UnknownClickType(String),

    /// Pointer backend failed a single operation
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Command stream ended with an error
    #[error("Transport terminated: {0}")]
    TransportTerminated(String),
}

/// Error classification for recovery strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Client sent something we cannot parse
    Protocol,
    /// Parsed, but names something we do not support
    Rejected,
    /// Pointer backend errors
    Platform,
    /// Connection errors
    Transport,
}

/// Classify error for recovery strategy selection
pub fn classify_error(error: &InputError) -> ErrorType {
    match error {
        InputError::MalformedCommand(_) => ErrorType::Protocol,
        InputError::UnknownClickType(_) => ErrorType::Rejected,
        InputError::Platform(_) => ErrorType::Platform,
        InputError::TransportTerminated(_) => ErrorType::Transport,
    }
}

/// Recovery action to take after error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Drop the command quietly
    Skip,

    /// Drop the command and surface it in the log
    Report,

    /// Stop the session loop
    EndSession,
}

/// Determine recovery action for error
pub fn recovery_action(error: &InputError) -> RecoveryAction {
    match classify_error(error) {
        ErrorType::Protocol => RecoveryAction::Skip,
        ErrorType::Rejected | ErrorType::Platform => RecoveryAction::Report,
        ErrorType::Transport => RecoveryAction::EndSession,
    }
}
