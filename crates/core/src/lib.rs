pub mod classification;
pub mod config;
pub mod config_loader;
pub mod file_watcher;

pub use classification::{Classification, Side};
pub use config::{AppConfig, ColumnConfig, DataConfig, EncoderScope, ModelConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use file_watcher::FileWatcher;
