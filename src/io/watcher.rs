use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches local source files for changes.
///
/// Editors often save by writing a new file and renaming it over the old
/// one, so the parent directories are watched and events are filtered
/// down to the source files themselves.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Vec<PathBuf>>,
}

impl SourceWatcher {
    pub fn start(files: &[PathBuf]) -> Result<Self, notify::Error> {
        let targets: BTreeSet<PathBuf> = files.iter().map(|f| normalize(f)).collect();
        let dirs: BTreeSet<PathBuf> = targets
            .iter()
            .filter_map(|f| f.parent().map(Path::to_path_buf))
            .collect();

        let (tx, rx) = mpsc::channel();
        let watched = targets.clone();
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| watched.contains(p))
                    .collect();
                if !relevant.is_empty() {
                    let _ = tx.send(relevant);
                }
            },
            Config::default(),
        )?;

        for dir in &dirs {
            if dir.is_dir() {
                watcher.watch(dir, RecursiveMode::NonRecursive)?;
            } else {
                tracing::warn!(dir = %dir.display(), "source directory missing, not watching");
            }
        }
        tracing::debug!(files = targets.len(), dirs = dirs.len(), "watching sources");

        Ok(SourceWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Block up to `timeout` for a change. Returns the changed files
    /// (deduplicated, bursts coalesced), or `None` on timeout.
    pub fn wait(&self, timeout: Duration) -> Option<Vec<PathBuf>> {
        let first = self.rx.recv_timeout(timeout).ok()?;
        let mut changed: BTreeSet<PathBuf> = first.into_iter().collect();
        // Give a save burst a moment to settle
        std::thread::sleep(Duration::from_millis(100));
        while let Ok(more) = self.rx.try_recv() {
            changed.extend(more);
        }
        Some(changed.into_iter().collect())
    }
}

/// Absolute path with a canonical parent, so event paths compare equal.
fn normalize(file: &Path) -> PathBuf {
    match (file.parent(), file.file_name()) {
        (Some(dir), Some(name)) => dir
            .canonicalize()
            .map(|d| d.join(name))
            .unwrap_or_else(|_| file.to_path_buf()),
        _ => file.to_path_buf(),
    }
}
