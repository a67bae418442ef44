//! Unit tests for config_store module
//! No filesystem, timing, or external dependencies.

#![allow(clippy::unwrap_used)]


use serde_json::json;

use crate::config_store::{ConfigError, Document};

#[test]
fn document_rejects_invalid_json() {
    assert!(Document::parse(vec![0]).is_err());
    assert!(Document::parse(b"{\"a\": ".to_vec()).is_err());
}

#[test]
fn document_keeps_raw_bytes_and_parsed_value() {
    let raw = br#"{"x": {"y": 1}}"#.to_vec();

    let document = Document::parse(raw.clone()).unwrap();

    assert_eq!(document.raw(), raw.as_slice());
    assert_eq!(document.value(), &json!({"x": {"y": 1}}));
    assert_eq!(document.get("x.y"), Some(json!(1)));
}

#[test]
fn config_error_predicates() {
    let error = ConfigError::EnvMissing {
        var: "CONFKEEP_CONF_PATH",
    };
    assert!(error.is_env_missing());
    assert!(!error.is_file_missing());

    let error = ConfigError::FileMissing {
        path: "missing.json".into(),
    };
    assert!(error.is_file_missing());
    assert!(!error.is_env_missing());
    assert!(!error.is_validation());

    let error = ConfigError::from(crate::schema::SchemaError::Required {
        field: "F".to_string(),
        path: "F".to_string(),
    });
    assert!(error.is_validation());
    assert_eq!(error.to_string(), "F is required, but blank");
}

#[test]
fn env_missing_message_names_variable() {
    let error = ConfigError::EnvMissing {
        var: "CONFKEEP_CONF_PATH",
    };

    assert_eq!(error.to_string(), "env CONFKEEP_CONF_PATH not set");
}
