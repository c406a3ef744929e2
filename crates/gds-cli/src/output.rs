//! Output formatting for gds (table, json)

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn success(&self, msg: &str) {
        println!("{}", msg.green());
    }

    pub fn info(&self, msg: &str) {
        println!("{}", msg);
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Section heading in table mode
    pub fn heading(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
    }

    /// Print rows as a table
    pub fn table<T: Tabled>(&self, rows: &[T]) {
        if rows.is_empty() {
            println!("{}", "(none)".dimmed());
        } else {
            println!("{}", Table::new(rows));
        }
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        for (key, value) in pairs {
            println!("{}: {}", key.bold(), value);
        }
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Telemetry register for inspect
#[derive(Debug, Tabled)]
pub struct CurrentDataRow {
    #[tabled(rename = "Pos")]
    pub position: u32,
    #[tabled(rename = "Index")]
    pub index: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Request")]
    pub request: String,
    #[tabled(rename = "Size")]
    pub size: String,
    #[tabled(rename = "Equation")]
    pub equation: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
}

/// Actuation test for inspect
#[derive(Debug, Tabled)]
pub struct ActuationRow {
    #[tabled(rename = "Index")]
    pub index: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Condition")]
    pub condition: String,
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "Stop")]
    pub stop: String,
    #[tabled(rename = "End")]
    pub end: String,
}

/// Trouble-code function for inspect
#[derive(Debug, Tabled)]
pub struct DtcRow {
    #[tabled(rename = "#")]
    pub number: usize,
    #[tabled(rename = "Requests")]
    pub requests: String,
    #[tabled(rename = "Codes")]
    pub codes: usize,
    #[tabled(rename = "With freeze frame")]
    pub with_freeze_frame: usize,
}

/// Guided procedure for inspect
#[derive(Debug, Tabled)]
pub struct ProcedureRow {
    #[tabled(rename = "Index")]
    pub index: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Steps")]
    pub steps: usize,
    #[tabled(rename = "Description")]
    pub description: String,
}

/// Catalog issue for inspect
#[derive(Debug, Tabled)]
pub struct IssueRow {
    #[tabled(rename = "Section")]
    pub section: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

/// Visited step for run
#[derive(Debug, Tabled)]
pub struct StepRow {
    #[tabled(rename = "Step")]
    pub step_no: u32,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Choice")]
    pub choice: String,
    #[tabled(rename = "Rule")]
    pub rule: String,
    #[tabled(rename = "Jump")]
    pub jump: String,
}

/// Render an optional value, `-` when absent
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
