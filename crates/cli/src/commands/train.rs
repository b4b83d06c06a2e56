//! Classifier section only.

use anyhow::{Context, Result};
use clap::Args;
use sentiment_desk_analytics::{Pipeline, ReportFormatter};

use super::input::{InputArgs, OutputFormat};

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Runs the train command.
///
/// An unavailable classifier is reported, not treated as a failure.
///
/// # Errors
/// Returns an error if the configuration or an input file cannot be loaded.
pub fn run_train(args: TrainArgs) -> Result<()> {
    let config = args.input.load_config()?;
    let filter = args.input.filter_spec()?;
    let mut pipeline = Pipeline::new(config);

    let section = pipeline
        .classifier(&filter)
        .context("Failed to load input data")?;
    if let Some(reason) = section.reason() {
        tracing::warn!("Classifier unavailable: {}", reason);
    }

    match args.input.format {
        OutputFormat::Text => println!("{}", ReportFormatter::format_classifier(&section)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&section).context("Failed to serialize model")?
        ),
    }
    Ok(())
}
