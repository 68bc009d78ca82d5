//! Check command - Validate templates without generating output.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use htmlindex_core::inspect_templates;

use super::{load_options, working_dir, CommandError};

#[derive(Args)]
pub struct CheckArgs {
    /// Configuration file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long, env = "HTMLINDEX_CONFIG")]
    config: PathBuf,

    /// Print the inspection results as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: CheckArgs) -> Result<()> {
    let options = load_options(&args.config, &working_dir()?)?;
    info!("Checking {} template(s)", options.templates.len());

    let inspections = inspect_templates(&options);
    let failed = inspections.iter().filter(|i| !i.issues().is_empty()).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspections)?);
        if failed > 0 {
            return Err(CommandError::CheckFailed(failed).into());
        }
        return Ok(());
    }

    if inspections.is_empty() {
        println!("⚠️  No templates configured");
        return Ok(());
    }

    for inspection in &inspections {
        let issues = inspection.issues();
        if inspection.skip {
            println!("⏭️  {} (skipped)", inspection.id);
        } else if issues.is_empty() {
            println!(
                "✅ {} [{}]",
                inspection.id,
                inspection.marker_names().join(" ")
            );
        } else {
            println!("❌ {}", inspection.id);
            for issue in issues {
                println!("   - {}", issue);
            }
        }
    }

    println!();
    println!(
        "Results: {} passed, {} failed",
        inspections.len() - failed,
        failed
    );

    if failed > 0 {
        return Err(CommandError::CheckFailed(failed).into());
    }

    Ok(())
}
