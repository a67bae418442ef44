use std::{env, path::PathBuf};

use crate::config_store::ConfigError;

/// Utility struct for locating configuration files
///
/// The base directory comes from the environment so deployments can move
/// every config file at once without touching the application.
pub struct ConfigPaths;

impl ConfigPaths {
    /// Environment variable holding the configuration directory.
    pub const ENV_VAR: &'static str = "CONFKEEP_CONF_PATH";

    /// Returns the configuration directory.
    ///
    /// # Errors
    /// Returns `ConfigError::EnvMissing` if `CONFKEEP_CONF_PATH` is unset or empty
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        match env::var_os(Self::ENV_VAR) {
            Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
            _ => Err(ConfigError::EnvMissing { var: Self::ENV_VAR }),
        }
    }

    /// Returns the path of `file_name` inside the configuration directory.
    ///
    /// # Errors
    /// Returns `ConfigError::EnvMissing` if the directory is not configured
    pub fn config_file(file_name: &str) -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(file_name))
    }
}
