//! Command-line interface for inspecting and watching config files.
//!
//! The CLI works on untyped documents: files are loaded into a raw
//! `serde_json::Value` record, so no field rules apply and any JSON file
//! can be checked, queried, or watched.

mod commands;
pub mod formatting;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{CliError, execute};

/// Top-level arguments of the `confkeep` binary.
#[derive(Debug, Parser)]
#[command(name = "confkeep", version, about = "Inspect and watch JSON config files")]
pub struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a file and report whether it is valid JSON
    Check {
        /// Config file to load
        file: PathBuf,
    },

    /// Print the value at a path
    Get {
        /// Config file to load
        file: PathBuf,
        /// Path inside the document, e.g. `servers.0.host`
        path: String,
    },

    /// Print every change of the value at a path until interrupted
    Watch {
        /// Config file to watch
        file: PathBuf,
        /// Path inside the document, e.g. `servers.0.host`
        path: String,
    },
}
