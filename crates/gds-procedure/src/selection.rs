//! Operator keystring choices

use std::collections::VecDeque;

use gds_core::{Keystring, ProcedureStep};

use crate::error::{InterpreterError, InterpreterResult};

/// Check a 0-based keystring choice
///
/// Pure: the caller owns any retry loop.
pub fn validate_selection(keystrings: &[Keystring], index: usize) -> InterpreterResult<usize> {
    if index < keystrings.len() {
        Ok(index)
    } else {
        Err(InterpreterError::InvalidSelection {
            index,
            available: keystrings.len(),
        })
    }
}

/// Resolves keystring choices for a run
///
/// Implementations may prompt an operator or replay a script. Returning
/// `None` cancels the run.
pub trait KeystringSelector {
    fn choose(&mut self, step: &ProcedureStep) -> Option<usize>;
}

impl<F> KeystringSelector for F
where
    F: FnMut(&ProcedureStep) -> Option<usize>,
{
    fn choose(&mut self, step: &ProcedureStep) -> Option<usize> {
        self(step)
    }
}

/// Replays a fixed list of choices, then cancels
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelector {
    choices: VecDeque<usize>,
}

impl ScriptedSelector {
    pub fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }

    /// Choices not consumed yet
    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

impl KeystringSelector for ScriptedSelector {
    fn choose(&mut self, _step: &ProcedureStep) -> Option<usize> {
        self.choices.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keystrings(n: usize) -> Vec<Keystring> {
        (0..n)
            .map(|i| Keystring {
                label: format!("choice {}", i),
                jump_step: None,
                selection_type: 1,
            })
            .collect()
    }

    #[test]
    fn test_validate_selection() {
        assert_eq!(validate_selection(&keystrings(2), 1), Ok(1));
        assert_eq!(
            validate_selection(&keystrings(2), 2),
            Err(InterpreterError::InvalidSelection {
                index: 2,
                available: 2
            })
        );
        assert!(validate_selection(&[], 0).is_err());
    }

    #[test]
    fn test_scripted_selector() {
        let step = ProcedureStep {
            step_no: 1,
            description: String::new(),
            message_index: 0,
            message: None,
            keystrings: keystrings(2),
            rules: Vec::new(),
        };
        let mut selector = ScriptedSelector::new([1, 0]);
        assert_eq!(selector.choose(&step), Some(1));
        assert_eq!(selector.remaining(), 1);
        assert_eq!(selector.choose(&step), Some(0));
        assert_eq!(selector.choose(&step), None);
    }
}
