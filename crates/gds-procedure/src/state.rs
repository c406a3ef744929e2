//! Run states and the execution trace

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Where a procedure run stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// The given step is visited on the next advance
    Running(u32),
    /// The given step waits for the operator to pick a keystring
    AwaitingSelection(u32),
    Completed,
    Aborted(AbortReason),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Aborted(_))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running(step_no) => write!(f, "running step {}", step_no),
            RunState::AwaitingSelection(step_no) => {
                write!(f, "step {} awaiting selection", step_no)
            }
            RunState::Completed => f.write_str("completed"),
            RunState::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// Why a run ended early
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    #[error("step {from} jumps to step {target}, which does not exist")]
    InvalidJumpTarget { from: u32, target: u32 },

    #[error("visited {limit} steps without finishing")]
    StepBudgetExhausted { limit: usize },

    #[error("no keystring chosen at step {step_no}")]
    SelectionCancelled { step_no: u32 },
}

/// One visited step, in visit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepVisit {
    pub step_no: u32,
    pub description: String,
    /// Resolved message text, absent for steps without a message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Index of the keystring the operator chose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_keystring: Option<usize>,
    /// Index of the response rule that produced the jump
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<usize>,
    /// Jump produced by a keystring or a rule; absent on fall-through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_target: Option<u32>,
}
