use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tracing::{debug, trace};

use super::ConfigError;

/// Outcome of the reload that a [`Pulse`] announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStatus {
    /// The file was read, decoded, and validated; the record was replaced.
    Reloaded,
    /// The reload failed; the record kept its previous value.
    Failed,
}

/// Wake-up signal sent after every reload triggered by a file change.
///
/// A pulse does not carry the new values; consumers read what they care
/// about from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// Monotonic reload counter for the store, starting at 1.
    pub generation: u64,
    /// Whether the reload succeeded.
    pub status: ReloadStatus,
}

/// Per-store pulse distribution.
///
/// Every subscription gets its own queue, so each consumer observes each
/// reload once no matter how many other consumers exist.
pub(super) struct PulseHub {
    sender: Mutex<Option<broadcast::Sender<Pulse>>>,
    generation: AtomicU64,
}

impl PulseHub {
    pub(super) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));

        Self {
            sender: Mutex::new(Some(sender)),
            generation: AtomicU64::new(0),
        }
    }

    /// Registers a new consumer that will see every pulse emitted from now on.
    ///
    /// # Errors
    /// Returns `ConfigError::WatchClosed` once the hub has been closed.
    pub(super) fn subscribe(&self) -> Result<Reloads, ConfigError> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);

        sender
            .as_ref()
            .map(|sender| Reloads {
                receiver: sender.subscribe(),
            })
            .ok_or(ConfigError::WatchClosed)
    }

    /// Announces a finished reload to every current subscriber.
    pub(super) fn emit(&self, status: ReloadStatus) -> Pulse {
        let pulse = Pulse {
            generation: self.generation.fetch_add(1, Ordering::Relaxed) + 1,
            status,
        };

        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref().map(|sender| sender.send(pulse)) {
            Some(Ok(receivers)) => trace!(generation = pulse.generation, receivers, "Pulse sent"),
            Some(Err(_)) => trace!(generation = pulse.generation, "Pulse sent with no subscribers"),
            None => debug!(generation = pulse.generation, "Pulse dropped, hub closed"),
        }

        pulse
    }

    /// Drops the sender; every waiting subscriber wakes with `WatchClosed`.
    pub(super) fn close(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    pub(super) fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// A subscription to a store's reload pulses.
///
/// Pulses emitted after the subscription was created are queued until read.
/// If a slow consumer falls more than the configured capacity behind, the
/// oldest pulses are collapsed.
pub struct Reloads {
    receiver: broadcast::Receiver<Pulse>,
}

impl Reloads {
    /// Waits for the next reload pulse.
    ///
    /// Dropping the returned future cancels the wait without losing the
    /// subscription, so this composes with `tokio::time::timeout` and
    /// `tokio::select!`.
    ///
    /// # Errors
    /// Returns `ConfigError::WatchClosed` when the store's watch is closed.
    pub async fn next(&mut self) -> Result<Pulse, ConfigError> {
        loop {
            match self.receiver.recv().await {
                Ok(pulse) => return Ok(pulse),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Collapsed lagging reload pulses");
                }
                Err(RecvError::Closed) => return Err(ConfigError::WatchClosed),
            }
        }
    }

    /// Waits until something may have changed.
    ///
    /// Unlike [`Reloads::next`], a lag counts as a wake-up since the consumer
    /// re-reads state anyway.
    pub(super) async fn changed(&mut self) -> Result<(), ConfigError> {
        match self.receiver.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) => Ok(()),
            Err(RecvError::Closed) => Err(ConfigError::WatchClosed),
        }
    }

    /// Converts the subscription into a stream that ends when the watch closes.
    pub fn into_stream(self) -> impl Stream<Item = Pulse> + Send + 'static {
        BroadcastStream::new(self.receiver).filter_map(Result::ok)
    }
}
