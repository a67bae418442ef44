//! JSON-backed configuration store with live reload.
//!
//! A [`ConfigStore`] binds one JSON file to a typed record, applies the
//! record's field rules on load, and writes it back on save. Once watching,
//! writes to the file reload the store and wake every [`Reloads`]
//! subscription and [`PathWatcher`] bound to it.

mod bootstrap;
mod document;
mod error;
mod file_watcher;
mod file_watching;
mod path_ops;
mod path_watcher;
mod pulse;
mod store;

#[cfg(test)]
mod tests;

pub use bootstrap::{load_or_bootstrap, load_or_bootstrap_in};
pub use document::Document;
pub use error::ConfigError;
pub use path_watcher::PathWatcher;
pub use pulse::{Pulse, ReloadStatus, Reloads};
pub use store::ConfigStore;
