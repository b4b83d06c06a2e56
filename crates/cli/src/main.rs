use clap::{Parser, Subcommand};

mod commands;

use commands::{ExportArgs, ReportArgs, TrainArgs, WatchArgs};

#[derive(Parser)]
#[command(name = "sentiment-desk")]
#[command(about = "Trader performance vs market sentiment analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print KPIs, sentiment breakdowns, classifier evaluation and recommendations
    Report(ReportArgs),
    /// Train and evaluate the profitability classifier only
    Train(TrainArgs),
    /// Write the merged, feature-enriched table to CSV
    Export(ExportArgs),
    /// Re-run the report whenever an input file changes
    Watch(WatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Report(args) => commands::run_report(args)?,
        Commands::Train(args) => commands::run_train(args)?,
        Commands::Export(args) => commands::run_export(args)?,
        Commands::Watch(args) => commands::run_watch(args)?,
    }

    Ok(())
}
