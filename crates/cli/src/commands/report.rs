//! Full dashboard report.

use anyhow::{Context, Result};
use clap::Args;
use sentiment_desk_analytics::{Pipeline, ReportFormatter};
use sentiment_desk_data::FilterSpec;

use super::input::{InputArgs, OutputFormat};

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Builds one report and renders it in `format`.
pub(crate) fn render_report(
    pipeline: &mut Pipeline,
    filter: &FilterSpec,
    format: OutputFormat,
) -> Result<String> {
    let report = pipeline
        .report(filter)
        .context("Failed to load input data")?;
    match format {
        OutputFormat::Text => Ok(ReportFormatter::format(&report)),
        OutputFormat::Json => {
            ReportFormatter::to_json(&report).context("Failed to serialize report")
        }
    }
}

/// Runs the report command.
///
/// # Errors
/// Returns an error if the configuration or an input file cannot be loaded.
pub fn run_report(args: ReportArgs) -> Result<()> {
    let config = args.input.load_config()?;
    let filter = args.input.filter_spec()?;
    tracing::info!(
        "Report for {} + {}",
        config.data.trades_path.display(),
        config.data.sentiment_path.display()
    );

    let mut pipeline = Pipeline::new(config);
    println!("{}", render_report(&mut pipeline, &filter, args.input.format)?);
    Ok(())
}
