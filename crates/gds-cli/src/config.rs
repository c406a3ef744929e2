//! Configuration file handling for gds

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use gds_procedure::RunOptions;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Lookup-store files loaded before any given on the command line
    #[serde(default)]
    pub lookup: Vec<PathBuf>,
    /// Symbol-table directory
    pub lut_dir: Option<PathBuf>,
    /// Default output format
    pub output: Option<OutputFormat>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Per-request timeout during procedure runs
    pub request_timeout_ms: Option<u64>,
    /// Step visits allowed per procedure run
    pub max_step_visits: Option<usize>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("gds");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    ///
    /// Lookup files accumulate, config files first, so later files override
    /// earlier keys.
    pub fn merge_with_args(
        &self,
        lookup: &[PathBuf],
        lut_dir: Option<&Path>,
        output: Option<OutputFormat>,
        no_color: bool,
    ) -> MergedConfig {
        let defaults = RunOptions::default();
        MergedConfig {
            lookup: self.lookup.iter().chain(lookup).cloned().collect(),
            lut_dir: lut_dir
                .map(Path::to_path_buf)
                .or_else(|| self.lut_dir.clone()),
            output: output.or(self.output).unwrap_or_default(),
            no_color: no_color || self.no_color.unwrap_or(false),
            run_options: RunOptions {
                request_timeout: self
                    .request_timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.request_timeout),
                max_step_visits: self.max_step_visits.unwrap_or(defaults.max_step_visits),
            },
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub lookup: Vec<PathBuf>,
    pub lut_dir: Option<PathBuf>,
    pub output: OutputFormat,
    pub no_color: bool,
    pub run_options: RunOptions,
}
