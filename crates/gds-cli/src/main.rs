//! gds - Command-line tool for GDS ECU definitions
//!
//! Inspects definition trees, decodes telemetry values and runs guided
//! procedures against scripted ECU responses.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "gds")]
#[command(author, version, about = "GDS ECU definition tool")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GDS_CONFIG")]
    config: Option<PathBuf>,

    /// Lookup-store file (YAML or JSON); repeat to layer several
    #[arg(short, long)]
    lookup: Vec<PathBuf>,

    /// Directory holding symbol tables (`<id>.lut`)
    #[arg(long, env = "GDS_LUT_DIR")]
    lut_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize an ECU definition
    Inspect {
        /// Definition tree (JSON or YAML)
        definition: PathBuf,
    },

    /// Convert a raw telemetry value
    Decode {
        /// Definition tree (JSON or YAML)
        definition: PathBuf,

        /// Telemetry position
        position: u32,

        /// Raw value, decimal or 0x-prefixed hex
        raw: String,
    },

    /// Run a guided procedure
    Run {
        /// Definition tree (JSON or YAML)
        definition: PathBuf,

        /// Procedure index
        procedure: u32,

        /// Keystring choice (1-based), consumed in order before prompting
        #[arg(short, long)]
        select: Vec<usize>,

        /// Scripted ECU responses (YAML list of request/response hex pairs)
        #[arg(short, long)]
        responses: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(
        &cli.lookup,
        cli.lut_dir.as_deref(),
        cli.output,
        cli.no_color,
    );

    let ctx = OutputContext::new(merged.output, merged.no_color);
    let lookup = commands::load_lookup(&merged)?;

    match &cli.command {
        Commands::Inspect { definition } => {
            let catalog = commands::load_catalog(definition, &lookup)?;
            commands::inspect(&catalog, definition, &ctx)?;
        }

        Commands::Decode {
            definition,
            position,
            raw,
        } => {
            let catalog = commands::load_catalog(definition, &lookup)?;
            commands::decode(&catalog, *position, raw, &ctx)?;
        }

        Commands::Run {
            definition,
            procedure,
            select,
            responses,
        } => {
            let catalog = commands::load_catalog(definition, &lookup)?;
            commands::run(
                &catalog,
                *procedure,
                select,
                responses.as_deref(),
                merged.run_options,
                &ctx,
            )?;
        }
    }

    Ok(())
}
