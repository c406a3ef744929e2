//! Run command - execute a guided procedure against a scripted transport

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use gds_catalog::DefinitionCatalog;
use gds_core::{MockTransport, ProcedureStep};
use gds_procedure::{
    validate_selection, KeystringSelector, ProcedureRun, RunOptions, RunState, ScriptedSelector,
};

use crate::output::{or_dash, OutputContext, StepRow};

/// Scripted choices first, then the operator on stdin
struct CliSelector<R> {
    scripted: ScriptedSelector,
    input: R,
    echo: bool,
}

impl<R: BufRead> CliSelector<R> {
    fn prompt(&mut self, step: &ProcedureStep) -> Option<usize> {
        loop {
            print!("Choice [1-{}]: ", step.keystrings.len());
            io::stdout().flush().ok()?;
            let mut line = String::new();
            if self.input.read_line(&mut line).ok()? == 0 {
                return None;
            }
            let line = line.trim();
            if line.is_empty() || line.eq_ignore_ascii_case("q") {
                return None;
            }
            match parse_choice(line).and_then(|i| {
                validate_selection(&step.keystrings, i).map_err(|e| anyhow!(e))
            }) {
                Ok(index) => return Some(index),
                Err(e) => eprintln!("{}", e.to_string().yellow()),
            }
        }
    }
}

impl<R: BufRead> KeystringSelector for CliSelector<R> {
    fn choose(&mut self, step: &ProcedureStep) -> Option<usize> {
        if self.echo {
            println!("{} {}", format!("[{}]", step.step_no).bold(), step.description);
            for line in step.message_lines() {
                println!("    {}", line);
            }
            for (i, keystring) in step.keystrings.iter().enumerate() {
                println!("  {}) {}", i + 1, keystring.label);
            }
        }
        match self.scripted.choose(step) {
            Some(index) => match validate_selection(&step.keystrings, index) {
                Ok(index) => Some(index),
                Err(e) => {
                    eprintln!("{}", format!("--select {}: {}", index + 1, e).yellow());
                    self.prompt(step)
                }
            },
            None => self.prompt(step),
        }
    }
}

/// Parse a 1-based choice as typed by the operator
fn parse_choice(input: &str) -> Result<usize> {
    let choice: usize = input
        .parse()
        .with_context(|| format!("Not a number: {}", input))?;
    choice
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Choices start at 1"))
}

pub fn run(
    catalog: &DefinitionCatalog,
    procedure_index: u32,
    select: &[usize],
    responses: Option<&Path>,
    options: RunOptions,
    ctx: &OutputContext,
) -> Result<()> {
    let procedure = catalog
        .procedure(procedure_index)
        .ok_or_else(|| anyhow!("No procedure with index {}", procedure_index))?;

    let transport = match responses {
        Some(path) => {
            let script = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read responses: {}", path.display()))?;
            MockTransport::from_script(&script)
                .with_context(|| format!("Failed to parse responses: {}", path.display()))?
        }
        None => MockTransport::new(),
    };

    // --select takes the same 1-based numbers as the prompt
    let scripted = select
        .iter()
        .map(|choice| {
            choice
                .checked_sub(1)
                .ok_or_else(|| anyhow!("Selections start at 1"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut selector = CliSelector {
        scripted: ScriptedSelector::new(scripted),
        input: io::stdin().lock(),
        echo: !ctx.is_json(),
    };
    if !ctx.is_json() {
        ctx.info(&format!("Running '{}'", procedure.name).bold().to_string());
    }

    let mut run = ProcedureRun::new(procedure, &catalog.communication, &transport, options);
    let total = catalog.communication.start_requests.len();
    if total > 0 {
        let accepted = run.start_communication();
        if accepted < total && !ctx.is_json() {
            ctx.warn(&format!(
                "{} of {} start requests answered as expected",
                accepted, total
            ));
        }
    }
    run.run_to_end(&mut selector)
        .with_context(|| format!("Procedure '{}' stopped", procedure.name))?;
    let outcome = run.into_outcome();

    if ctx.is_json() {
        return ctx.json(&outcome);
    }

    ctx.heading("Trace");
    let rows: Vec<StepRow> = outcome
        .trace
        .iter()
        .map(|visit| StepRow {
            step_no: visit.step_no,
            description: visit.description.clone(),
            choice: or_dash(visit.chosen_keystring.map(|i| i + 1)),
            rule: or_dash(visit.matched_rule.map(|i| i + 1)),
            jump: or_dash(visit.jump_target),
        })
        .collect();
    ctx.table(&rows);

    match &outcome.state {
        RunState::Completed => ctx.success("Procedure completed"),
        state => ctx.error(&format!("Procedure {}", state)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gds_core::Keystring;
    use pretty_assertions::assert_eq;

    fn step() -> ProcedureStep {
        ProcedureStep {
            step_no: 1,
            description: "Is the lamp on?".to_string(),
            message_index: 0,
            message: None,
            keystrings: ["Yes", "No"]
                .iter()
                .map(|label| Keystring {
                    label: label.to_string(),
                    jump_step: None,
                    selection_type: 1,
                })
                .collect(),
            rules: Vec::new(),
        }
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("2").unwrap(), 1);
        assert!(parse_choice("0").is_err());
        assert!(parse_choice("yes").is_err());
    }

    #[test]
    fn test_selector_reprompts_until_valid() {
        let mut selector = CliSelector {
            scripted: ScriptedSelector::default(),
            input: io::Cursor::new("7\nabc\n2\n"),
            echo: false,
        };
        assert_eq!(selector.choose(&step()), Some(1));
    }

    #[test]
    fn test_selector_scripted_then_eof() {
        let mut selector = CliSelector {
            scripted: ScriptedSelector::new([0]),
            input: io::Cursor::new(""),
            echo: false,
        };
        assert_eq!(selector.choose(&step()), Some(0));
        assert_eq!(selector.choose(&step()), None);
    }

    #[test]
    fn test_out_of_range_scripted_choice_falls_back_to_prompt() {
        let mut selector = CliSelector {
            scripted: ScriptedSelector::new([4, 0]),
            input: io::Cursor::new("2
"),
            echo: false,
        };
        // The bad scripted choice is consumed and the operator answers instead
        assert_eq!(selector.choose(&step()), Some(1));
        assert_eq!(selector.choose(&step()), Some(0));
        assert_eq!(selector.scripted.remaining(), 0);
    }
}
