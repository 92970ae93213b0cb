//! Error types for the hockey core.

use crate::types::Cell;
use derive_more::{Display, Error};
use tracing::instrument;

/// Invalid board geometry, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Board config error: {} at {}:{}", message, file, line)]
pub struct BoardConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardConfigError {
    /// Creates a new board configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Error raised when a strategy cannot produce a move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SelectError {
    /// Every edge out of the puck cell is already taken.
    #[display("No legal move from {}", from)]
    NoLegalMove {
        /// Cell the puck is stuck on.
        from: Cell,
    },
}

impl std::error::Error for SelectError {}

/// Error raised while applying a server event to a session.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// The event is not valid in the current phase.
    #[display("Event '{}' is not valid while {}", event, phase)]
    OutOfPhase {
        /// Kind of event received.
        event: &'static str,
        /// Phase the session was in.
        phase: &'static str,
    },

    /// The event needs the puck position, which the server never sent.
    #[display("Event '{}' arrived before any puck position", event)]
    PuckUnknown {
        /// Kind of event received.
        event: &'static str,
    },

    /// The strategy could not pick a move.
    #[display("{}", _0)]
    Select(SelectError),

    /// A session invariant failed after applying an event.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for SessionError {}

impl From<SelectError> for SessionError {
    fn from(err: SelectError) -> Self {
        SessionError::Select(err)
    }
}
