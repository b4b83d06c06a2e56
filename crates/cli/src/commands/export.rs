//! Writes the analysis-ready table to CSV.

use anyhow::{Context, Result};
use clap::Args;
use sentiment_desk_analytics::Pipeline;
use std::path::PathBuf;

use super::input::InputArgs;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output CSV file path
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Runs the export command.
///
/// # Errors
/// Returns an error if an input cannot be loaded or the output cannot be written.
pub fn run_export(args: ExportArgs) -> Result<()> {
    let config = args.input.load_config()?;
    let filter = args.input.filter_spec()?;
    let mut pipeline = Pipeline::new(config);

    let rows = pipeline
        .export(&filter, &args.output)
        .with_context(|| format!("Failed to export to {}", args.output.display()))?;
    tracing::info!("Exported {} rows to {}", rows, args.output.display());
    Ok(())
}
