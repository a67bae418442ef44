use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::{
    Command,
    formatting::{format_json_value, format_success},
};
use crate::config_store::{ConfigError, ConfigStore};

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// The config store rejected the operation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The requested path does not exist in the document.
    #[error("no value at '{path}' in {file}")]
    PathNotFound {
        /// The queried document path
        path: String,
        /// The file that was queried
        file: PathBuf,
    },

    /// Waiting for the interrupt signal failed.
    #[error("failed to listen for Ctrl+C: {0}")]
    Signal(#[from] std::io::Error),
}

/// Runs a parsed command and returns the text to print.
///
/// # Errors
/// Returns `CliError` if the file cannot be loaded or the path is missing.
pub async fn execute(command: Command) -> Result<String, CliError> {
    match command {
        Command::Check { file } => check(file),
        Command::Get { file, path } => get(file, &path),
        Command::Watch { file, path } => watch(file, &path).await,
    }
}

fn open(file: PathBuf) -> Result<ConfigStore<Value>, CliError> {
    let store = ConfigStore::open(file, Value::Null);
    store.load()?;
    Ok(store)
}

fn check(file: PathBuf) -> Result<String, CliError> {
    let store = open(file)?;
    Ok(format_success(&format!("{} is valid", store.path().display())))
}

fn get(file: PathBuf, path: &str) -> Result<String, CliError> {
    let store = open(file)?;

    let value = store.value_at(path).ok_or_else(|| CliError::PathNotFound {
        path: path.to_string(),
        file: store.path().to_path_buf(),
    })?;

    Ok(format_json_value(Some(&value)))
}

async fn watch(file: PathBuf, path: &str) -> Result<String, CliError> {
    let store = open(file)?;
    store.start_watching().await?;

    let mut watcher = store.watch(path)?;
    println!("{path} = {}", format_json_value(watcher.current()));
    println!("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            change = watcher.next() => {
                let value = change?;
                info!(path, "Watched value changed");
                println!("{path} = {}", format_json_value(value.as_ref()));
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                debug!("Interrupted");
                break;
            }
        }
    }

    store.close();
    Ok("Watch ended".to_string())
}
