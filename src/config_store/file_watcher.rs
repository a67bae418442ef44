use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};
use tokio::{sync::mpsc, task::JoinHandle};

use super::ConfigError;

/// Raw file system notification relevant to the watched config file.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum FileEvent {
    /// The file was created, written, or replaced
    Written(PathBuf),
    /// The OS watch reported an error; watching continues
    Failed(String),
}

/// OS-level watch on a single config file.
///
/// Watches the file's parent directory so saves that replace the file (write
/// to a temp file, then rename) are seen as well as in-place writes. Events
/// for other entries in the directory are filtered out.
pub(super) struct FileMonitor {
    _watcher: RecommendedWatcher,
    target: PathBuf,
    listener: Option<JoinHandle<()>>,
}

impl FileMonitor {
    /// Starts watching `path` and returns the monitor with its event receiver.
    ///
    /// Uses an unbounded channel since file events are typically infrequent but bursty.
    ///
    /// # Errors
    /// Returns `ConfigError::FileWatcherInitError` if the OS watcher cannot be
    /// created, or `ConfigError::FileWatchError` if the directory cannot be watched.
    pub(super) fn new(
        path: &Path,
    ) -> Result<(Self, mpsc::UnboundedReceiver<FileEvent>), ConfigError> {
        let target = watch_target(path)?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let filter_target = target.clone();
        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    let _ = event_tx.send(FileEvent::Failed(e.to_string()));
                    return;
                }
            };

            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }

            if event.paths.iter().any(|p| p == &filter_target) {
                let _ = event_tx.send(FileEvent::Written(filter_target.clone()));
            }
        })
        .map_err(|e| ConfigError::FileWatcherInitError {
            details: e.to_string(),
        })?;

        let directory = target.parent().unwrap_or(Path::new("/"));
        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::FileWatchError {
                path: target.clone(),
                details: e.to_string(),
            })?;

        let monitor = Self {
            _watcher: watcher,
            target,
            listener: None,
        };

        Ok((monitor, event_rx))
    }

    /// The path whose events are forwarded.
    pub(super) fn target(&self) -> &Path {
        &self.target
    }

    /// Ties the listener task's lifetime to this monitor.
    pub(super) fn attach_listener(&mut self, listener: JoinHandle<()>) {
        self.listener = Some(listener);
    }
}

impl Drop for FileMonitor {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

/// Resolves the directory through symlinks but keeps the file name as given,
/// matching how the OS reports events for entries of a watched directory.
fn watch_target(path: &Path) -> Result<PathBuf, ConfigError> {
    let invalid = |details: &str| ConfigError::FileWatchError {
        path: path.to_path_buf(),
        details: details.to_string(),
    };

    let file_name = path.file_name().ok_or_else(|| invalid("path has no file name"))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let directory = directory
        .canonicalize()
        .map_err(|e| ConfigError::FileWatchError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    Ok(directory.join(file_name))
}
