use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{info, warn};

/// Watches a config file for changes.
///
/// The notify backend runs on its own thread and only forwards events into a
/// channel; the polling loop drains it with [`ConfigWatcher::changed`], so
/// reloads happen between ticks.
///
/// # Example
/// ```no_run
/// let mut watcher = portal_config::ConfigWatcher::spawn("/home/user/.config/portal/portal.toml");
/// loop {
///     if watcher.changed() {
///         println!("config changed, reloading");
///     }
/// #   break;
/// }
/// ```
pub struct ConfigWatcher {
    path:     PathBuf,
    rx:       mpsc::Receiver<notify::Result<Event>>,
    /// Kept alive for as long as events are wanted.
    _watcher: Option<RecommendedWatcher>,
}

impl ConfigWatcher {
    /// Start watching `path`.  Failure to set up the backend is logged and
    /// yields a watcher that never fires.
    pub fn spawn(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::channel();

        let watcher = match RecommendedWatcher::new(
            tx,
            Config::default().with_poll_interval(Duration::from_secs(2)),
        ) {
            Ok(mut w) => match w.watch(&path, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    info!("Watching config file: {}", path.display());
                    Some(w)
                }
                Err(e) => {
                    warn!("Failed to watch '{}': {e}", path.display());
                    None
                }
            },
            Err(e) => {
                warn!("Failed to create filesystem watcher: {e}");
                None
            }
        };

        Self {
            path,
            rx,
            _watcher: watcher,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events.  `true` if any of them modified or recreated
    /// the file since the last call.
    pub fn changed(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(e) => {
                    if matches!(e.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        changed = true;
                    }
                }
                Err(e) => warn!("Watcher error: {e}"),
            }
        }
        changed
    }
}
