//! CLI command definitions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;

use htmlindex_core::{BuildOptions, IndexConfig};

pub mod build;
pub mod check;

/// htmlindex - debug and compiled HTML entry point generator
#[derive(Parser)]
#[command(name = "htmlindex")]
#[command(version, about = "Generate debug and compiled HTML index files from templates")]
#[command(long_about = r#"
Generates HTML entry points for the debug and compiled builds of a web
application from index templates.

COMMANDS:
  build  → Write debug indexes to basePath and compiled indexes to distPath
  check  → Report missing templates and unknown placeholder tokens

EXIT CODES:
  0 - Success
  1 - General error
  2 - Configuration error
  3 - Vendor manifest could not be read
  4 - One or more templates failed
  5 - Debug loader generation failed
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate index files
    Build(build::BuildArgs),

    /// Validate configured templates without writing output
    Check(check::CheckArgs),
}

/// Failures reported by commands after the library finished.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0} template(s) failed to build")]
    TemplatesFailed(usize),

    #[error("{0} template(s) have issues")]
    CheckFailed(usize),
}

/// Load the configuration file and resolve it against `working_dir`.
///
/// `basePath` defaults to `working_dir`, and every relative path in the
/// file resolves against it.
pub fn load_options(config_path: &Path, working_dir: &Path) -> Result<BuildOptions> {
    let config = IndexConfig::load(config_path)?;
    let options = config
        .resolve(working_dir)
        .with_context(|| format!("resolving {}", config_path.display()))?;
    Ok(options)
}

/// Directory the command was started from, captured once per invocation.
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("reading working directory")
}
