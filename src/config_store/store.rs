use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, instrument, trace};

use crate::{
    config::{ConfigPaths, StoreOptions},
    schema::{self, Schema},
};

use super::{
    ConfigError, Document, PathWatcher, Pulse, Reloads, file_watcher::FileMonitor,
    path_ops::overlay_values, pulse::PulseHub,
};

/// Lifecycle of a store's file watch.
pub(super) enum MonitorState {
    Idle,
    Watching(FileMonitor),
    Closed,
}

pub(super) struct StoreInner<T> {
    pub(super) path: PathBuf,
    pub(super) options: StoreOptions,
    record: RwLock<T>,
    pub(super) document: Arc<ArcSwapOption<Document>>,
    pub(super) pulses: PulseHub,
    pub(super) monitor: Mutex<MonitorState>,
}

/// A config file bound to a typed record.
///
/// The store owns the record, the file path, and the last successfully
/// parsed file content. `load` and `save` move data between disk and the
/// record, applying the record's [`Schema`] rules on the way in. Once
/// watching, every write to the file reloads the store and wakes
/// [`Reloads`] subscribers and [`PathWatcher`]s.
///
/// Cloning is cheap; clones share the same record and watch.
pub struct ConfigStore<T> {
    pub(super) inner: Arc<StoreInner<T>>,
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ConfigStore<T>
where
    T: Schema + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Binds `file_name` inside the configured directory to `record` and
    /// starts watching it.
    ///
    /// The record is not loaded; call [`ConfigStore::load`] next.
    ///
    /// # Errors
    /// * `ConfigError::EnvMissing` - If `CONFKEEP_CONF_PATH` is not set
    /// * `ConfigError::FileMissing` - If the file does not exist; the caller
    ///   may create it with [`ConfigStore::open`] and [`ConfigStore::save`]
    /// * File watcher errors if the watch cannot be armed
    pub async fn init(file_name: &str, record: T) -> Result<Self, ConfigError> {
        let path = ConfigPaths::config_file(file_name)?;
        Self::init_at(path, record, StoreOptions::default()).await
    }

    /// Same as [`ConfigStore::init`] with an explicit directory.
    ///
    /// # Errors
    /// * `ConfigError::FileMissing` - If the file does not exist
    /// * File watcher errors if the watch cannot be armed
    pub async fn init_in(
        dir: impl AsRef<Path>,
        file_name: &str,
        record: T,
    ) -> Result<Self, ConfigError> {
        Self::init_with_options(dir, file_name, record, StoreOptions::default()).await
    }

    /// Same as [`ConfigStore::init_in`] with custom [`StoreOptions`].
    ///
    /// # Errors
    /// * `ConfigError::FileMissing` - If the file does not exist
    /// * File watcher errors if the watch cannot be armed
    pub async fn init_with_options(
        dir: impl AsRef<Path>,
        file_name: &str,
        record: T,
        options: StoreOptions,
    ) -> Result<Self, ConfigError> {
        Self::init_at(dir.as_ref().join(file_name), record, options).await
    }

    #[instrument(skip(record, options), fields(path = %path.display()))]
    async fn init_at(path: PathBuf, record: T, options: StoreOptions) -> Result<Self, ConfigError> {
        debug!("Init config");

        if !path.exists() {
            return Err(ConfigError::FileMissing { path });
        }

        let store = Self::open_with_options(path, record, options);
        store.start_watching().await?;

        Ok(store)
    }
}

impl<T> ConfigStore<T>
where
    T: Schema + Default + Serialize + DeserializeOwned,
{
    /// Binds `path` to `record` without checking the file or watching it.
    pub fn open(path: impl Into<PathBuf>, record: T) -> Self {
        Self::open_with_options(path, record, StoreOptions::default())
    }

    /// Same as [`ConfigStore::open`] with custom [`StoreOptions`].
    pub fn open_with_options(path: impl Into<PathBuf>, record: T, options: StoreOptions) -> Self {
        let pulses = PulseHub::new(options.pulse_capacity);

        Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                options,
                record: RwLock::new(record),
                document: Arc::new(ArcSwapOption::empty()),
                pulses,
                monitor: Mutex::new(MonitorState::Idle),
            }),
        }
    }

    /// Reads the file into the record.
    ///
    /// The bytes must be valid JSON; they become the store's current
    /// [`Document`] before decoding. The document is laid over the serialized
    /// `T::default()`, so fields missing from the file decode as blank and
    /// pick up their defaults. The decoded record then has its field rules
    /// applied. The bound record is replaced only if every step succeeds, so
    /// a failed load leaves the previous record intact.
    ///
    /// # Errors
    /// * `ConfigError::IoError` - If the file cannot be read
    /// * `ConfigError::Format` - If the content is not valid JSON
    /// * `ConfigError::Decode` - If the JSON does not match the record
    /// * `ConfigError::Schema` - If a field rule rejects the record
    /// * `ConfigError::LockError` - If the record lock is poisoned
    #[instrument(skip(self), fields(path = %self.inner.path.display()))]
    pub fn load(&self) -> Result<(), ConfigError> {
        let mut record = self
            .inner
            .record
            .write()
            .map_err(|e| ConfigError::lock("write", e))?;

        debug!("Loading config");
        let raw = fs::read(&self.inner.path).map_err(|e| ConfigError::io(&self.inner.path, e))?;

        let document = Document::parse(raw).map_err(|e| ConfigError::Format {
            path: self.inner.path.clone(),
            details: e.to_string(),
        })?;
        let document = Arc::new(document);
        self.inner.document.store(Some(Arc::clone(&document)));

        let blank = serde_json::to_value(T::default()).map_err(|e| {
            ConfigError::SerializationError {
                details: e.to_string(),
            }
        })?;
        let merged = overlay_values(blank, document.value().clone());

        let mut decoded: T = Deserialize::deserialize(merged).map_err(|e| ConfigError::Decode {
            path: self.inner.path.clone(),
            details: e.to_string(),
        })?;

        schema::process(&mut decoded)?;

        *record = decoded;
        trace!("Config loaded");

        Ok(())
    }

    /// Writes the record to the file as 2-space indented JSON.
    ///
    /// The record is serialized under the lock; the write itself happens
    /// after releasing it, through a uniquely named sibling temp file renamed
    /// over the target so readers never see a half-written file and
    /// concurrent saves do not collide.
    ///
    /// # Errors
    /// * `ConfigError::SerializationError` - If the record cannot be serialized
    /// * `ConfigError::IoError` - If the file cannot be written
    /// * `ConfigError::LockError` - If the record lock is poisoned
    #[instrument(skip(self), fields(path = %self.inner.path.display()))]
    pub fn save(&self) -> Result<(), ConfigError> {
        debug!("Saving config");

        let bytes = {
            let record = self
                .inner
                .record
                .read()
                .map_err(|e| ConfigError::lock("read", e))?;

            serde_json::to_vec_pretty(&*record).map_err(|e| ConfigError::SerializationError {
                details: e.to_string(),
            })?
        };

        write_atomically(&self.inner.path, &bytes, self.inner.options.file_mode)
    }

    /// Stops watching the file and then saves the record.
    ///
    /// # Errors
    /// Same as [`ConfigStore::save`].
    pub fn save_and_close(&self) -> Result<(), ConfigError> {
        self.close();
        self.save()
    }

    /// Stops watching the file.
    ///
    /// Every pending [`Reloads::next`] and [`PathWatcher::next`] wakes with
    /// `ConfigError::WatchClosed`. Closing is final for this store.
    pub fn close(&self) {
        debug!(path = %self.inner.path.display(), "Closing config");

        let previous = {
            let mut state = self
                .inner
                .monitor
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, MonitorState::Closed)
        };
        drop(previous);

        self.inner.pulses.close();
    }

    /// Creates a watcher for the value at `path` in the file's JSON.
    ///
    /// Paths are dot-separated (`"server.port"`), numeric segments index
    /// arrays (`"servers.2.host"`), `\.` escapes a dot inside a key, and `#`
    /// on an array yields its length (`"servers.#"`) or maps the rest of the
    /// path over its elements (`"servers.#.host"`). Paths address the raw
    /// document, independent of the record's field names.
    ///
    /// The watcher starts from the value currently in the document, so only
    /// later changes are reported.
    ///
    /// # Errors
    /// Returns `ConfigError::WatchClosed` if the store was closed.
    pub fn watch(&self, path: &str) -> Result<PathWatcher, ConfigError> {
        let reloads = self.inner.pulses.subscribe()?;
        Ok(PathWatcher::new(
            path,
            Arc::clone(&self.inner.document),
            reloads,
        ))
    }

    /// Subscribes to reload pulses.
    ///
    /// # Errors
    /// Returns `ConfigError::WatchClosed` if the store was closed.
    pub fn subscribe(&self) -> Result<Reloads, ConfigError> {
        self.inner.pulses.subscribe()
    }

    /// Waits for the next reload that happens after this call.
    ///
    /// # Errors
    /// Returns `ConfigError::WatchClosed` if the store is or becomes closed.
    pub async fn next(&self) -> Result<Pulse, ConfigError> {
        self.subscribe()?.next().await
    }

    /// Runs `f` with shared access to the record.
    ///
    /// # Errors
    /// Returns `ConfigError::LockError` if the record lock is poisoned.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, ConfigError> {
        let record = self
            .inner
            .record
            .read()
            .map_err(|e| ConfigError::lock("read", e))?;
        Ok(f(&record))
    }

    /// Runs `f` with exclusive access to the record, e.g. before a save.
    ///
    /// # Errors
    /// Returns `ConfigError::LockError` if the record lock is poisoned.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, ConfigError> {
        let mut record = self
            .inner
            .record
            .write()
            .map_err(|e| ConfigError::lock("write", e))?;
        Ok(f(&mut record))
    }

    /// Returns a clone of the current record, handling poisoned locks gracefully
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        match self.inner.record.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The last document accepted by [`ConfigStore::load`], if any.
    pub fn document(&self) -> Option<Arc<Document>> {
        self.inner.document.load_full()
    }

    /// Extracts the value at `path` from the current document.
    pub fn value_at(&self, path: &str) -> Option<Value> {
        self.document().and_then(|document| document.get(path))
    }

    /// Extracts and deserializes the value at `path` from the current document.
    ///
    /// # Errors
    /// * `ConfigError::InvalidPath` - If nothing exists at the path
    /// * `ConfigError::TypeMismatch` - If the value cannot be deserialized into `V`
    pub fn get_by_path<V: DeserializeOwned>(&self, path: &str) -> Result<V, ConfigError> {
        let value = self
            .value_at(path)
            .ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;

        V::deserialize(&value).map_err(|_| ConfigError::TypeMismatch {
            path: path.to_string(),
            expected_type: std::any::type_name::<V>(),
            actual_value: value.clone(),
        })
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Whether a file watch is currently armed.
    pub fn is_watching(&self) -> bool {
        matches!(
            *self
                .inner
                .monitor
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
            MonitorState::Watching(_)
        )
    }

    /// Whether [`ConfigStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.pulses.is_closed()
    }
}

fn write_atomically(path: &Path, bytes: &[u8], mode: u32) -> Result<(), ConfigError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| ConfigError::io(parent, e))?;
    temp.write_all(bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| ConfigError::io(temp.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| ConfigError::io(temp.path(), e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    temp.persist(path)
        .map(|_| ())
        .map_err(|e| ConfigError::io(path, e.error))
}
