//! The step interpreter

use gds_core::{
    BusTransport, BytePattern, CommunicationSetup, Keystring, Procedure, ProcedureStep,
    ResponseRule,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RunOptions;
use crate::error::{InterpreterError, InterpreterResult};
use crate::selection::{validate_selection, KeystringSelector};
use crate::state::{AbortReason, RunState, StepVisit};

/// Final state and trace of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub procedure: String,
    pub state: RunState,
    pub trace: Vec<StepVisit>,
}

/// One execution of a guided procedure
///
/// The run borrows the procedure and communication setup read-only, so any
/// number of runs may share one catalog. State and trace are private to the
/// run.
pub struct ProcedureRun<'a, T: BusTransport> {
    procedure: &'a Procedure,
    comm: &'a CommunicationSetup,
    transport: T,
    options: RunOptions,
    state: RunState,
    trace: Vec<StepVisit>,
}

impl<'a, T: BusTransport> ProcedureRun<'a, T> {
    /// Start at the first step; a procedure without steps is already complete
    pub fn new(
        procedure: &'a Procedure,
        comm: &'a CommunicationSetup,
        transport: T,
        options: RunOptions,
    ) -> Self {
        let state = match procedure.first_step() {
            Some(step) => RunState::Running(step.step_no),
            None => RunState::Completed,
        };
        Self {
            procedure,
            comm,
            transport,
            options,
            state,
            trace: Vec::new(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Steps visited so far
    pub fn trace(&self) -> &[StepVisit] {
        &self.trace
    }

    /// Keystrings offered by the step awaiting selection
    pub fn pending_keystrings(&self) -> Option<&'a [Keystring]> {
        match self.state {
            RunState::AwaitingSelection(step_no) => self
                .procedure
                .step(step_no)
                .map(|step| step.keystrings.as_slice()),
            _ => None,
        }
    }

    /// Send the setup's start-communication requests, in order
    ///
    /// Returns how many were answered with their expected prefix. A run can
    /// still proceed against an ECU that ignored them, so failures are only
    /// logged.
    pub fn start_communication(&self) -> usize {
        let mut accepted = 0;
        for request in &self.comm.start_requests {
            let payload = match request.payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(request = %request.request_payload, error = %e, "Unusable start request");
                    continue;
                }
            };
            match self.transport.send_and_receive(
                self.comm.tx_id,
                self.comm.rx_id,
                self.comm.protocol,
                payload,
                self.options.request_timeout,
            ) {
                Ok(response) if request.accepts(&response) => accepted += 1,
                Ok(response) => warn!(
                    request = %request.request_payload,
                    response = %hex::encode(&response),
                    "Unexpected start response"
                ),
                Err(e) => warn!(request = %request.request_payload, error = %e, "Start request failed"),
            }
        }
        debug!(
            accepted,
            total = self.comm.start_requests.len(),
            "Start-communication requests sent"
        );
        accepted
    }

    /// Visit the current step
    ///
    /// Stops at [`RunState::AwaitingSelection`] when the step asks the
    /// operator; resume with [`ProcedureRun::select`].
    pub fn advance(&mut self) -> InterpreterResult<&RunState> {
        let step_no = match self.state {
            RunState::Running(step_no) => step_no,
            RunState::AwaitingSelection(step_no) => {
                return Err(InterpreterError::SelectionPending { step_no })
            }
            RunState::Completed | RunState::Aborted(_) => return Err(InterpreterError::Finished),
        };

        if self.trace.len() >= self.options.max_step_visits {
            warn!(
                procedure = %self.procedure.name,
                limit = self.options.max_step_visits,
                "Step budget exhausted"
            );
            self.state = RunState::Aborted(AbortReason::StepBudgetExhausted {
                limit: self.options.max_step_visits,
            });
            return Ok(&self.state);
        }

        let procedure = self.procedure;
        let Some(step) = procedure.step(step_no) else {
            // Running is only entered for steps that exist
            self.state = RunState::Aborted(AbortReason::InvalidJumpTarget {
                from: step_no,
                target: step_no,
            });
            return Ok(&self.state);
        };

        info!(step_no, description = %step.description, "Visiting step");
        for line in step.message_lines() {
            info!(step_no, "{}", line);
        }
        self.trace.push(StepVisit {
            step_no,
            description: step.description.clone(),
            message: step.message.clone(),
            chosen_keystring: None,
            matched_rule: None,
            jump_target: None,
        });

        if step.awaits_selection() {
            self.state = RunState::AwaitingSelection(step_no);
            return Ok(&self.state);
        }

        self.finish_step(step);
        Ok(&self.state)
    }

    /// Apply the operator's 0-based keystring choice
    ///
    /// An out-of-range choice is rejected and leaves the run waiting.
    pub fn select(&mut self, index: usize) -> InterpreterResult<&RunState> {
        let RunState::AwaitingSelection(step_no) = self.state else {
            return Err(InterpreterError::NoSelectionPending);
        };
        let procedure = self.procedure;
        let step = procedure
            .step(step_no)
            .ok_or(InterpreterError::NoSelectionPending)?;
        let index = validate_selection(&step.keystrings, index)?;
        let keystring = &step.keystrings[index];
        debug!(step_no, index, label = %keystring.label, "Keystring chosen");

        if let Some(visit) = self.trace.last_mut() {
            visit.chosen_keystring = Some(index);
        }
        match keystring.jump_step {
            Some(target) => {
                self.record_jump(None, target);
                self.jump(step_no, target);
            }
            None => self.finish_step(step),
        }
        Ok(&self.state)
    }

    /// Abort the run at the step awaiting selection
    pub fn cancel(&mut self) -> InterpreterResult<&RunState> {
        let RunState::AwaitingSelection(step_no) = self.state else {
            return Err(InterpreterError::NoSelectionPending);
        };
        info!(step_no, "Selection cancelled");
        self.state = RunState::Aborted(AbortReason::SelectionCancelled { step_no });
        Ok(&self.state)
    }

    /// Drive the run until it completes or aborts
    ///
    /// Choices come from `selector`; a `None` choice cancels the run. An
    /// invalid choice is returned as an error with the run still waiting.
    pub fn run_to_end(
        &mut self,
        selector: &mut impl KeystringSelector,
    ) -> InterpreterResult<RunState> {
        loop {
            match self.state {
                RunState::Running(_) => {
                    self.advance()?;
                }
                RunState::AwaitingSelection(step_no) => {
                    let procedure = self.procedure;
                    let step = procedure
                        .step(step_no)
                        .ok_or(InterpreterError::NoSelectionPending)?;
                    match selector.choose(step) {
                        Some(index) => self.select(index)?,
                        None => self.cancel()?,
                    };
                }
                RunState::Completed | RunState::Aborted(_) => return Ok(self.state.clone()),
            }
        }
    }

    pub fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            procedure: self.procedure.name.clone(),
            state: self.state,
            trace: self.trace,
        }
    }

    /// Evaluate the step's response rules and move on
    fn finish_step(&mut self, step: &ProcedureStep) {
        match self.evaluate_rules(step) {
            Some((rule, target)) => {
                self.record_jump(Some(rule), target);
                self.jump(step.step_no, target);
            }
            None => self.fall_through(step.step_no),
        }
    }

    /// First rule, in declaration order, that yields a jump target
    fn evaluate_rules(&self, step: &ProcedureStep) -> Option<(usize, u32)> {
        step.rules
            .iter()
            .enumerate()
            .find_map(|(i, rule)| self.evaluate_rule(step.step_no, rule).map(|t| (i, t)))
    }

    fn evaluate_rule(&self, step_no: u32, rule: &ResponseRule) -> Option<u32> {
        let payload = match BytePattern::parse_payload(&rule.request_payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(step_no, request = %rule.request_payload, error = %e, "Unusable rule request");
                return None;
            }
        };
        let response = match self.transport.send_and_receive(
            self.comm.tx_id,
            self.comm.rx_id,
            self.comm.protocol,
            payload,
            self.options.request_timeout,
        ) {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(step_no, request = %rule.request_payload, "Request timed out");
                return None;
            }
            Err(e) => {
                warn!(step_no, request = %rule.request_payload, error = %e, "Request failed");
                return None;
            }
        };
        let Some(value) = rule.extract(&response) else {
            warn!(
                step_no,
                response = %hex::encode(&response),
                expected = %rule.response_format,
                "Malformed response"
            );
            return None;
        };
        let matched = rule.first_match(value);
        debug!(step_no, value, matched = ?matched.map(|(i, _)| i), "Response compared");
        matched.map(|(_, code)| code.jump_step)
    }

    fn record_jump(&mut self, rule: Option<usize>, target: u32) {
        if let Some(visit) = self.trace.last_mut() {
            visit.matched_rule = rule;
            visit.jump_target = Some(target);
        }
    }

    fn jump(&mut self, from: u32, target: u32) {
        self.state = if target == 0 {
            RunState::Completed
        } else if self.procedure.step(target).is_some() {
            RunState::Running(target)
        } else {
            warn!(from, target, "Jump to a step that does not exist");
            RunState::Aborted(AbortReason::InvalidJumpTarget { from, target })
        };
    }

    fn fall_through(&mut self, from: u32) {
        let next = from.checked_add(1).filter(|n| self.procedure.step(*n).is_some());
        self.state = match next {
            Some(next) => RunState::Running(next),
            None => RunState::Completed,
        };
    }
}
