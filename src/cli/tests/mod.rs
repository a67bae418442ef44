//! Unit tests for CLI module
//!
//! Tests argument parsing, formatting, and the one-shot commands against
//! temporary files.

#![allow(clippy::unwrap_used)]

use std::fs;

use clap::Parser;
use serde_json::json;
use tempfile::TempDir;

use crate::cli::{
    Cli, CliError, Command, execute,
    formatting::{Colors, format_error, format_json_value, format_success},
};
use crate::config_store::ConfigError;

#[test]
fn format_json_value_scalars() {
    assert_eq!(format_json_value(Some(&json!("hello world"))), "\"hello world\"");
    assert_eq!(format_json_value(Some(&json!(42))), "42");
    assert_eq!(format_json_value(Some(&json!(-2.5))), "-2.5");
    assert_eq!(format_json_value(Some(&json!(true))), "true");
    assert_eq!(format_json_value(Some(&json!(null))), "null");
}

#[test]
fn format_json_value_containers_are_compact() {
    assert_eq!(format_json_value(Some(&json!([1, "two", 3.0]))), "[1,\"two\",3.0]");
    assert_eq!(format_json_value(Some(&json!({"k": {"n": 1}}))), "{\"k\":{\"n\":1}}");
}

#[test]
fn format_json_value_absent() {
    let formatted = format_json_value(None);
    assert!(formatted.contains("<absent>"));
    assert!(formatted.starts_with(Colors::DIM));
}

#[test]
fn status_formatting_wraps_in_colors() {
    assert_eq!(format_success("ok"), format!("{}ok{}", Colors::GREEN, Colors::RESET));
    assert!(format_error("bad").contains(Colors::RED));
    assert!(format_error("bad").ends_with(Colors::RESET));
}

#[test]
fn parses_get_command() {
    let cli = Cli::try_parse_from(["confkeep", "get", "app.json", "servers.0.host"]).unwrap();

    assert!(cli.log_dir.is_none());
    match cli.command {
        Command::Get { file, path } => {
            assert_eq!(file.to_str(), Some("app.json"));
            assert_eq!(path, "servers.0.host");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn log_dir_is_global() {
    let args = ["confkeep", "check", "app.json", "--log-dir", "/tmp/logs"];
    let cli = Cli::try_parse_from(args).unwrap();

    assert_eq!(cli.log_dir.unwrap().to_str(), Some("/tmp/logs"));
    assert!(matches!(cli.command, Command::Check { .. }));
}

#[test]
fn watch_requires_a_path() {
    assert!(Cli::try_parse_from(["confkeep", "watch", "app.json"]).is_err());
}

#[tokio::test]
async fn check_accepts_valid_json() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("app.json");
    fs::write(&file, r#"{"name": "demo"}"#).unwrap();

    let output = execute(Command::Check { file }).await.unwrap();
    assert!(output.contains("is valid"));
}

#[tokio::test]
async fn check_rejects_invalid_json() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("app.json");
    fs::write(&file, "{ not json").unwrap();

    let err = execute(Command::Check { file }).await.unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::Format { .. })));
}

#[tokio::test]
async fn get_prints_value_at_path() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("app.json");
    fs::write(&file, r#"{"servers": [{"host": "a"}, {"host": "b"}]}"#).unwrap();

    let output = execute(Command::Get {
        file: file.clone(),
        path: "servers.1.host".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(output, "\"b\"");

    let output = execute(Command::Get {
        file,
        path: "servers.#".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(output, "2");
}

#[tokio::test]
async fn get_reports_missing_path() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("app.json");
    fs::write(&file, r#"{"name": "demo"}"#).unwrap();

    let err = execute(Command::Get {
        file,
        path: "port".to_string(),
    })
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::PathNotFound { ref path, .. } if path == "port"));
}
