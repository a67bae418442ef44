//! Confkeep - schema-driven JSON configuration with live reload.
//!
//! An application describes its config record once through the
//! [`schema::Schema`] trait: which fields take a default literal and which
//! are required. A [`config_store::ConfigStore`] then loads the record from a
//! JSON file, applies those rules, saves it back, and reloads it whenever the
//! file changes on disk. Consumers can wait for reloads or watch a single
//! path inside the document for value changes.
//!
//! Fields missing from the file load as their `Default` value and are then
//! treated as blank, so record types need no `#[serde(default)]`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use confkeep::config_store::ConfigStore;
//! use confkeep::schema::{FieldRule, Schema, SchemaError, Walker};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! struct AppConfig {
//!     name: String,
//!     port: u16,
//! }
//!
//! impl Schema for AppConfig {
//!     fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
//!         walker.field("name", &mut self.name, FieldRule::new().required())?;
//!         walker.field("port", &mut self.port, FieldRule::new().with_default("8080"))
//!     }
//! }
//!
//! # async fn run() -> confkeep::Result<()> {
//! let store = ConfigStore::init("app.json", AppConfig::default()).await?;
//! store.load()?;
//!
//! let mut port = store.watch("port")?;
//! while let Some(value) = port.next().await? {
//!     println!("port changed to {value}");
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface for inspecting and watching config files.
pub mod cli;

/// Store settings: config directory resolution and tuning options.
pub mod config;

/// JSON-backed configuration store with change tracking.
pub mod config_store;

/// Field rules and the recursive walker that enforces them.
pub mod schema;

/// Logging setup for binaries embedding the store.
pub mod tracing_config;

pub use config_store::ConfigError;

/// A specialized `Result` type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
