use std::path::PathBuf;

use serde_json::Value;

use crate::schema::SchemaError;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration directory is not set in the environment
    #[error("env {var} not set")]
    EnvMissing {
        /// Name of the environment variable that was expected
        var: &'static str,
    },

    /// The configuration file does not exist
    #[error("config file '{path}' missing")]
    FileMissing {
        /// Resolved path of the missing file
        path: PathBuf,
    },

    /// A missing file was created from the supplied record and needs editing
    #[error("config file '{path}' did not exist, created it with default content")]
    Bootstrapped {
        /// Path of the newly written file
        path: PathBuf,
    },

    /// The file content is not syntactically valid JSON
    #[error("'{path}' is not a valid JSON file: {details}")]
    Format {
        /// Path of the offending file
        path: PathBuf,
        /// Parser error details
        details: String,
    },

    /// The JSON is valid but does not fit the record's shape
    #[error("failed to decode '{path}': {details}")]
    Decode {
        /// Path of the offending file
        path: PathBuf,
        /// Decoder error details
        details: String,
    },

    /// A field rule rejected the decoded record
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Error occurred while serializing configuration
    #[error("failed to serialize config: {details}")]
    SerializationError {
        /// Serialization error details
        details: String,
    },

    /// Error occurred during file I/O operations
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Error occurred while acquiring locks for thread-safe access
    #[error("failed to acquire {lock_type} lock: {details}")]
    LockError {
        /// Type of lock that failed (read, write)
        lock_type: String,
        /// Lock error details
        details: String,
    },

    /// Failed to initialize file watcher
    #[error("failed to initialize file watcher: {details}")]
    FileWatcherInitError {
        /// File watcher initialization error details
        details: String,
    },

    /// Error occurred while watching a specific file
    #[error("file watcher error for '{path}': {details}")]
    FileWatchError {
        /// Path being watched when error occurred
        path: PathBuf,
        /// File watcher error details
        details: String,
    },

    /// The store's watch was closed; no further reloads will be announced
    #[error("config watch closed")]
    WatchClosed,

    /// No value exists at the requested document path
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// The value at a path does not have the requested type
    #[error("Type mismatch at {path}: Expected {expected_type}, got {actual_value}")]
    TypeMismatch {
        /// The path where the type mismatch occurred.
        path: String,
        /// The expected type name.
        expected_type: &'static str,
        /// The actual value found in the document.
        actual_value: Value,
    },
}

impl ConfigError {
    /// Whether this error means the configuration directory is not configured.
    ///
    /// Callers usually treat this as fatal.
    pub fn is_env_missing(&self) -> bool {
        matches!(self, ConfigError::EnvMissing { .. })
    }

    /// Whether this error means the configuration file does not exist yet.
    ///
    /// Callers can bootstrap a fresh file with
    /// [`ConfigStore::save`](super::ConfigStore::save) instead of aborting.
    pub fn is_file_missing(&self) -> bool {
        matches!(self, ConfigError::FileMissing { .. })
    }

    /// Whether this error came from a field rule rather than from I/O or parsing.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConfigError::Schema(_))
    }

    pub(super) fn io(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        ConfigError::IoError {
            path: path.into(),
            details: error.to_string(),
        }
    }

    pub(super) fn lock(lock_type: &str, error: impl std::fmt::Display) -> Self {
        ConfigError::LockError {
            lock_type: lock_type.to_string(),
            details: error.to_string(),
        }
    }
}
