//! CLI commands for the sentiment analytics pipeline.

pub mod export;
pub mod input;
pub mod report;
pub mod train;
pub mod watch;

pub use export::{run_export, ExportArgs};
pub use report::{run_report, ReportArgs};
pub use train::{run_train, TrainArgs};
pub use watch::{run_watch, WatchArgs};
