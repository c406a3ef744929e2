//! Interpreter error types

use thiserror::Error;

pub type InterpreterResult<T> = Result<T, InterpreterError>;

/// Misuse of a run by its driver
///
/// These never change the run state; the driver may correct the call and
/// continue. Conditions that end a run are [`crate::AbortReason`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    #[error("Selection {index} out of range, {available} keystrings available")]
    InvalidSelection { index: usize, available: usize },

    #[error("Step {step_no} is waiting for a keystring selection")]
    SelectionPending { step_no: u32 },

    #[error("No keystring selection is pending")]
    NoSelectionPending,

    #[error("Run already finished")]
    Finished,
}
