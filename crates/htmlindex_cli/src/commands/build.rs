//! Build command - Generate debug and compiled indexes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use htmlindex_core::{BuildMode, IndexOrchestrator, TemplateState};

use super::{load_options, working_dir, CommandError};

#[derive(Args)]
pub struct BuildArgs {
    /// Configuration file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long, env = "HTMLINDEX_CONFIG")]
    config: PathBuf,

    /// Only generate debug indexes
    #[arg(long)]
    debug_only: bool,

    /// Override the configured app version
    #[arg(long)]
    app_version: Option<String>,

    /// Override the package version used in compiled indexes
    #[arg(long)]
    override_version: Option<String>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: BuildArgs) -> Result<()> {
    let mut options = load_options(&args.config, &working_dir()?)?;

    if let Some(version) = args.app_version {
        options.app_version = version;
    }
    if let Some(version) = args.override_version {
        options.override_version = version;
    }

    let mode = if args.debug_only {
        BuildMode::DebugOnly
    } else {
        BuildMode::Full
    };

    info!(
        "Building {} template(s) from {:?}",
        options.templates.len(),
        options.base_path
    );

    let report = IndexOrchestrator::new(options).mode(mode).run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            match &outcome.state {
                TemplateState::Failed(reason) => println!("❌ {}: {}", outcome.id, reason),
                TemplateState::Skipped => println!("⏭️  {}: skipped", outcome.id),
                _ => {
                    let outputs: Vec<String> = outcome
                        .outputs
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect();
                    println!("✅ {}: {}", outcome.id, outputs.join(", "));
                }
            }
        }
    }

    let failed = report.failures().len();
    if failed > 0 {
        return Err(CommandError::TemplatesFailed(failed).into());
    }

    Ok(())
}
