//! Guided, branching test procedures

use serde::Serialize;

use super::read_be;
use crate::pattern::BytePattern;

/// An operator choice offered at a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keystring {
    pub label: String,
    /// Step to continue at when chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_step: Option<u32>,
    /// Non-zero on the first keystring means the step waits for a choice
    pub selection_type: u32,
}

/// One comparison against response data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonCode {
    pub code: u64,
    /// `true`: match on equality, `false`: match on inequality
    pub compare_equal: bool,
    pub jump_step: u32,
}

impl ComparisonCode {
    pub fn matches(&self, value: u64) -> bool {
        (value == self.code) == self.compare_equal
    }
}

/// Expected response to one outstanding request of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseRule {
    /// Command bytes as hex text
    pub request_payload: String,
    /// Expected response prefix, `XX` = any byte
    pub response_format: BytePattern,
    /// Width in bytes of the compared data
    pub data_size: usize,
    /// Byte offset of the compared data within the response
    pub start_position: usize,
    pub codes: Vec<ComparisonCode>,
}

impl ResponseRule {
    /// Compared data of a response, `None` if the response is malformed
    pub fn extract(&self, response: &[u8]) -> Option<u64> {
        if !self.response_format.matches_prefix(response) {
            return None;
        }
        read_be(response, self.start_position, self.data_size)
    }

    /// First code matching `value`, in declaration order
    pub fn first_match(&self, value: u64) -> Option<(usize, &ComparisonCode)> {
        self.codes.iter().enumerate().find(|(_, c)| c.matches(value))
    }
}

/// One step of a guided procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureStep {
    /// 1-based, unique within the procedure
    pub step_no: u32,
    pub description: String,
    /// 0 means the step has no message
    pub message_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub keystrings: Vec<Keystring>,
    pub rules: Vec<ResponseRule>,
}

impl ProcedureStep {
    /// Whether the step waits for an operator choice
    pub fn awaits_selection(&self) -> bool {
        self.keystrings
            .first()
            .map_or(false, |k| k.selection_type != 0)
    }

    /// Message text split into display lines
    pub fn message_lines(&self) -> Vec<String> {
        self.message
            .as_deref()
            .map(split_message_lines)
            .unwrap_or_default()
    }
}

/// A guided procedure (`addfunction`) of an ECU
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Procedure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub name: String,
    pub description: String,
    /// Sorted by `step_no`
    pub steps: Vec<ProcedureStep>,
}

impl Procedure {
    pub fn step(&self, step_no: u32) -> Option<&ProcedureStep> {
        self.steps
            .binary_search_by_key(&step_no, |s| s.step_no)
            .ok()
            .map(|i| &self.steps[i])
    }

    pub fn first_step(&self) -> Option<&ProcedureStep> {
        self.steps.first()
    }
}

/// Split message text on literal `\n` sequences
///
/// Lines are trimmed; runs of blank lines collapse to one.
pub fn split_message_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.split("\\n") {
        let line = line.replace('\n', "");
        let line = line.trim();
        if line.is_empty() && lines.last().map_or(false, |l| l.is_empty()) {
            continue;
        }
        lines.push(line.to_string());
    }
    lines
}
