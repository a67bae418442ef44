use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, warn};

use crate::{config::ConfigPaths, schema::Schema};

use super::{ConfigError, ConfigStore};

/// Opens, watches, and loads `file_name` from the configured directory,
/// creating the file from `record` if it does not exist yet.
///
/// A freshly created file is reported as `ConfigError::Bootstrapped` rather
/// than loaded, since it usually still lacks required values the user has to
/// fill in.
///
/// # Errors
/// * `ConfigError::EnvMissing` - If `CONFKEEP_CONF_PATH` is not set
/// * `ConfigError::Bootstrapped` - If the file was just created
/// * Any error from [`ConfigStore::init`], [`ConfigStore::save`] or [`ConfigStore::load`]
pub async fn load_or_bootstrap<T>(file_name: &str, record: T) -> Result<ConfigStore<T>, ConfigError>
where
    T: Schema + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let dir = ConfigPaths::config_dir()?;
    load_or_bootstrap_in(dir, file_name, record).await
}

/// Same as [`load_or_bootstrap`] with an explicit directory.
///
/// # Errors
/// * `ConfigError::Bootstrapped` - If the file was just created
/// * Any error from [`ConfigStore::init_in`], [`ConfigStore::save`] or [`ConfigStore::load`]
pub async fn load_or_bootstrap_in<T>(
    dir: impl AsRef<Path>,
    file_name: &str,
    record: T,
) -> Result<ConfigStore<T>, ConfigError>
where
    T: Schema + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let path = dir.as_ref().join(file_name);

    if !path.exists() {
        warn!(path = %path.display(), "JSON config file does not exist, creating it");
        ConfigStore::open(path.clone(), record).save()?;
        return Err(ConfigError::Bootstrapped { path });
    }

    let store = ConfigStore::init_in(dir, file_name, record).await?;
    store.load()?;
    info!(path = %store.path().display(), "Config loaded");

    Ok(store)
}
