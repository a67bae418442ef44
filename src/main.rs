//! `confkeep` - inspect and watch JSON config files from the shell.

use std::{error::Error, process};

use clap::Parser;
use confkeep::{
    cli::{self, Cli, formatting::format_error},
    tracing_config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    let guard = match &args.log_dir {
        Some(dir) => Some(tracing_config::init_with_file(dir)?),
        None => {
            tracing_config::init()?;
            None
        }
    };

    match cli::execute(args.command).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            drop(guard);
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
