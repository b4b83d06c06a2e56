//! Re-runs the report whenever an input file changes.

use anyhow::Result;
use clap::Args;
use sentiment_desk_analytics::Pipeline;
use sentiment_desk_core::FileWatcher;
use std::time::Duration;

use super::input::InputArgs;
use super::report::render_report;

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Quiet period after a change before re-running, in milliseconds
    #[arg(long, default_value_t = 250)]
    pub debounce_ms: u64,
}

/// Runs the watch command. Blocks until the watcher stops.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or watching fails
/// to start. Load failures after a change are logged and watching continues.
pub fn run_watch(args: WatchArgs) -> Result<()> {
    let config = args.input.load_config()?;
    let filter = args.input.filter_spec()?;
    let format = args.input.format;
    let paths = vec![
        config.data.trades_path.clone(),
        config.data.sentiment_path.clone(),
    ];

    let mut pipeline = Pipeline::new(config);
    match render_report(&mut pipeline, &filter, format) {
        Ok(output) => println!("{output}"),
        Err(e) => tracing::error!("Initial run failed: {:#}", e),
    }

    FileWatcher::new(paths)
        .with_debounce(Duration::from_millis(args.debounce_ms))
        .watch(|| {
            pipeline.invalidate();
            let output = render_report(&mut pipeline, &filter, format)?;
            println!("{output}");
            Ok(())
        })
}
