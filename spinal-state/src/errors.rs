//! Error types for driving derivation states.

use thiserror::Error;

/// Errors from selecting or executing an action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// Action index past the end of the current action list.
    #[error("action {index} out of range: {available} actions available")]
    ActionOutOfRange { index: usize, available: usize },

    /// Outcome index past the end of the action's splice results.
    #[error("outcome {index} out of range: {available} outcomes available")]
    OutcomeOutOfRange { index: usize, available: usize },

    /// Substitution into a state that has no tree yet.
    #[error("cannot substitute into a derivation that has not started")]
    NotStarted,

    /// Action object that cannot apply in the current phase.
    #[error("illegal action {action}: {reason}")]
    IllegalAction { action: String, reason: String },
}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;
