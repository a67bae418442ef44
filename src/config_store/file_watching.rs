use std::{sync::Weak, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::schema::Schema;

use super::{
    ConfigError, ConfigStore, ReloadStatus,
    file_watcher::{FileEvent, FileMonitor},
    store::{MonitorState, StoreInner},
};

impl<T> ConfigStore<T>
where
    T: Schema + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Starts monitoring the config file for changes.
    ///
    /// Every write to the file (after a short debounce) reloads the store and
    /// then emits one pulse to every subscriber. Reload failures are logged
    /// and still pulsed, flagged as [`ReloadStatus::Failed`]. Calling this on a
    /// store that is already watching is a no-op.
    ///
    /// # Errors
    /// Returns `ConfigError::WatchClosed` if the store was closed, or a file
    /// watcher error if the OS watch cannot be set up.
    #[instrument(skip(self), fields(path = %self.path().display()))]
    pub async fn start_watching(&self) -> Result<(), ConfigError> {
        let mut state = self
            .inner
            .monitor
            .lock()
            .map_err(|e| ConfigError::lock("monitor", e))?;

        match *state {
            MonitorState::Watching(_) => return Ok(()),
            MonitorState::Closed => return Err(ConfigError::WatchClosed),
            MonitorState::Idle => {}
        }

        let (mut monitor, event_rx) = FileMonitor::new(self.path())?;
        let listener = tokio::spawn(listen(
            std::sync::Arc::downgrade(&self.inner),
            event_rx,
            self.inner.options.debounce,
        ));
        monitor.attach_listener(listener);

        info!(target_file = %monitor.target().display(), "Watching config file");
        *state = MonitorState::Watching(monitor);

        Ok(())
    }
}

/// Background loop turning raw file events into reloads and pulses.
///
/// Ends when the monitor is dropped (which closes the event channel) or when
/// the store itself is gone.
async fn listen<T>(
    store: Weak<StoreInner<T>>,
    mut event_rx: mpsc::UnboundedReceiver<FileEvent>,
    debounce: Duration,
) where
    T: Schema + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let debounce_sleep = tokio::time::sleep(debounce);
    tokio::pin!(debounce_sleep);
    let mut pending = false;

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(FileEvent::Written(path)) => {
                    debug!(file = %path.display(), "Config file modified");
                    pending = true;
                    debounce_sleep.as_mut().reset(tokio::time::Instant::now() + debounce);
                }
                Some(FileEvent::Failed(details)) => {
                    warn!(%details, "Config file watcher error");
                }
                None => break,
            },

            () = &mut debounce_sleep, if pending => {
                pending = false;

                let Some(inner) = store.upgrade() else {
                    break;
                };
                let store = ConfigStore { inner };

                debug!("Reloading config");
                let status = match store.load() {
                    Ok(()) => ReloadStatus::Reloaded,
                    Err(e) => {
                        error!(error = %e, "Failed to reload config");
                        ReloadStatus::Failed
                    }
                };

                store.inner.pulses.emit(status);
            }
        }
    }

    debug!("Config file listener stopped");
}
