//! htmlindex CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Configuration error
//! - 3: Vendor manifest could not be read
//! - 4: One or more templates failed
//! - 5: Debug loader generation failed

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use htmlindex_core::IndexError;

mod commands;

use commands::{Cli, CommandError, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const CONFIG_ERROR: u8 = 2;
    pub const MANIFEST_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const LOADER_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "htmlindex=debug"
    } else if cli.quiet {
        "htmlindex=warn"
    } else {
        "htmlindex=info"
    };

    // Logging may already be initialized by an embedding harness.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive(level.parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args).await,
        Commands::Check(args) => commands::check::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Map an error to its exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(index_error) = e.downcast_ref::<IndexError>() {
        return match index_error {
            IndexError::ConfigLoad { .. } => ExitCodes::CONFIG_ERROR,
            IndexError::ManifestRead { .. } => ExitCodes::MANIFEST_ERROR,
            IndexError::MissingTemplate { .. } => ExitCodes::TEMPLATE_ERROR,
            IndexError::LoaderGeneration(_) => ExitCodes::LOADER_ERROR,
            _ => ExitCodes::GENERAL_ERROR,
        };
    }

    match e.downcast_ref::<CommandError>() {
        Some(CommandError::TemplatesFailed(_)) | Some(CommandError::CheckFailed(_)) => {
            ExitCodes::TEMPLATE_ERROR
        }
        None => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_categorize_error() {
        let config: anyhow::Error = IndexError::ConfigLoad {
            path: PathBuf::from("index.json"),
            message: "missing".to_string(),
        }
        .into();
        assert_eq!(categorize_error(&config), ExitCodes::CONFIG_ERROR);

        let manifest = Err::<(), _>(IndexError::ManifestRead {
            path: PathBuf::from(".build/resources-js-dist-index"),
            source: std::io::Error::other("denied"),
        })
        .context("building index")
        .unwrap_err();
        assert_eq!(categorize_error(&manifest), ExitCodes::MANIFEST_ERROR);

        let failed: anyhow::Error = CommandError::TemplatesFailed(2).into();
        assert_eq!(categorize_error(&failed), ExitCodes::TEMPLATE_ERROR);

        assert_eq!(
            categorize_error(&anyhow::anyhow!("unexpected")),
            ExitCodes::GENERAL_ERROR
        );
    }
}
