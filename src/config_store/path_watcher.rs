use std::sync::Arc;

use arc_swap::ArcSwapOption;
use futures::Stream;
use serde_json::Value;
use tracing::trace;

use super::{ConfigError, Document, Reloads, path_ops::same_value};

/// Watches a single path inside a store's document for value changes.
///
/// Created by [`ConfigStore::watch`](super::ConfigStore::watch). Each reload
/// wakes the watcher, which re-reads its path from the fresh document and
/// reports only actual transitions; reloads that leave the value alone are
/// absorbed. Numbers compare by value, so rewriting `1` as `1.0` is not a
/// change. A missing path reads as `None` and compares like any value.
pub struct PathWatcher {
    path: String,
    last: Option<Value>,
    document: Arc<ArcSwapOption<Document>>,
    reloads: Reloads,
}

impl PathWatcher {
    pub(super) fn new(
        path: &str,
        document: Arc<ArcSwapOption<Document>>,
        reloads: Reloads,
    ) -> Self {
        let last = extract(&document, path);

        Self {
            path: path.to_string(),
            last,
            document,
            reloads,
        }
    }

    /// The watched path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value seen after the last processed reload.
    pub fn current(&self) -> Option<&Value> {
        self.last.as_ref()
    }

    /// Waits until the value at the path differs from the last seen value
    /// and returns it (`None` if the path disappeared).
    ///
    /// Cancel by dropping the future, e.g. through `tokio::time::timeout`.
    ///
    /// # Errors
    /// Returns `ConfigError::WatchClosed` when the store's watch is closed.
    pub async fn next(&mut self) -> Result<Option<Value>, ConfigError> {
        loop {
            self.reloads.changed().await?;

            let value = extract(&self.document, &self.path);
            if unchanged(value.as_ref(), self.last.as_ref()) {
                trace!(path = %self.path, "Reload left watched value unchanged");
                continue;
            }

            self.last.clone_from(&value);
            return Ok(value);
        }
    }

    /// Converts the watcher into a stream of changed values that ends when
    /// the watch closes.
    pub fn into_stream(self) -> impl Stream<Item = Option<Value>> + Send + 'static {
        futures::stream::unfold(self, |mut watcher| async move {
            match watcher.next().await {
                Ok(value) => Some((value, watcher)),
                Err(_) => None,
            }
        })
    }
}

fn extract(document: &ArcSwapOption<Document>, path: &str) -> Option<Value> {
    document
        .load_full()
        .and_then(|document| document.get(path))
}

fn unchanged(current: Option<&Value>, last: Option<&Value>) -> bool {
    match (current, last) {
        (Some(current), Some(last)) => same_value(current, last),
        (None, None) => true,
        _ => false,
    }
}
