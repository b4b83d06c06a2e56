use anyhow::{Context, Result};
use notify::{Event, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Watches a fixed set of input files and invokes a callback when any changes.
///
/// Parent directories are watched rather than the files themselves, so editors
/// that replace a file on save still trigger a reload.
pub struct FileWatcher {
    paths: Vec<PathBuf>,
    debounce: Duration,
}

impl FileWatcher {
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            debounce: Duration::from_millis(250),
        }
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Blocks, calling `on_change` after each burst of relevant file events.
    ///
    /// Callback errors are logged and do not stop the watcher.
    ///
    /// # Errors
    ///
    /// Returns an error if file watching cannot be initiated.
    pub fn watch<F>(&self, mut on_change: F) -> Result<()>
    where
        F: FnMut() -> Result<()>,
    {
        let (tx, rx) = mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        })?;

        for dir in self.watched_dirs() {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
            tracing::info!("Watching {} for changes", dir.display());
        }

        while let Ok(event) = rx.recv() {
            if !self.is_relevant(&event) {
                continue;
            }

            // Swallow the rest of the burst (write + metadata + rename).
            while rx.recv_timeout(self.debounce).is_ok() {}

            tracing::info!("Input file changed, re-running pipeline...");
            if let Err(e) = on_change() {
                tracing::error!("Re-run failed: {:#}", e);
            }
        }

        Ok(())
    }

    fn watched_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .paths
            .iter()
            .map(|p| match p.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            })
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    /// True when the event modifies or recreates one of the watched files.
    #[must_use]
    pub fn is_relevant(&self, event: &Event) -> bool {
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|changed| self.paths.iter().any(|p| same_file(changed, p)))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.file_name().is_some() && a.file_name() == b.file_name() && a.ends_with(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, EventKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn modify_of_watched_file_is_relevant() {
        let watcher = FileWatcher::new(vec![PathBuf::from("/data/trades.csv")]);
        assert!(watcher.is_relevant(&event(
            EventKind::Modify(ModifyKind::Any),
            "/data/trades.csv"
        )));
        assert!(watcher.is_relevant(&event(
            EventKind::Create(CreateKind::File),
            "/data/trades.csv"
        )));
    }

    #[test]
    fn other_files_and_access_events_are_ignored() {
        let watcher = FileWatcher::new(vec![PathBuf::from("/data/trades.csv")]);
        assert!(!watcher.is_relevant(&event(
            EventKind::Modify(ModifyKind::Any),
            "/data/other.csv"
        )));
        assert!(!watcher.is_relevant(&event(
            EventKind::Access(AccessKind::Any),
            "/data/trades.csv"
        )));
    }

    #[test]
    fn parent_directories_are_deduplicated() {
        let watcher = FileWatcher::new(vec![
            PathBuf::from("data/trades.csv"),
            PathBuf::from("data/sentiment.csv"),
            PathBuf::from("bare.csv"),
        ]);
        assert_eq!(
            watcher.watched_dirs(),
            vec![PathBuf::from("."), PathBuf::from("data")]
        );
    }
}
