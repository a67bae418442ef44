//! Unit tests for the schema walker.
//! Pure in-memory records, no filesystem.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldRule, Schema, SchemaError, Walker, process};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Inner {
    name: String,
    retries: u32,
}

impl Schema for Inner {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field("name", &mut self.name, FieldRule::new().required())?;
        walker.field("retries", &mut self.retries, FieldRule::new().with_default("3"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Record {
    a: String,
    b: u64,
    c: bool,
    inner: Inner,
    items: Vec<Inner>,
    f: String,
}

impl Schema for Record {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field("A", &mut self.a, FieldRule::new().with_default("A"))?;
        walker.field("B", &mut self.b, FieldRule::new().with_default("1"))?;
        walker.field("C", &mut self.c, FieldRule::new().with_default("true"))?;
        walker.field("Inner", &mut self.inner, FieldRule::NONE)?;
        walker.field("Items", &mut self.items, FieldRule::NONE)?;
        walker.field("F", &mut self.f, FieldRule::new().required())
    }
}

fn filled_record() -> Record {
    Record {
        inner: Inner {
            name: "inner".to_string(),
            retries: 0,
        },
        items: vec![
            Inner {
                name: "first".to_string(),
                retries: 7,
            },
            Inner {
                name: "second".to_string(),
                retries: 0,
            },
        ],
        f: "V".to_string(),
        ..Record::default()
    }
}

#[test]
fn applies_scalar_defaults_to_blank_fields() {
    let mut record = filled_record();

    process(&mut record).unwrap();

    assert_eq!(record.a, "A");
    assert_eq!(record.b, 1);
    assert!(record.c);
    assert_eq!(record.f, "V");
}

#[test]
fn keeps_non_blank_values() {
    let mut record = filled_record();
    record.a = "custom".to_string();
    record.b = 42;

    process(&mut record).unwrap();

    assert_eq!(record.a, "custom");
    assert_eq!(record.b, 42);
}

#[test]
fn recurses_into_nested_records_and_sequences() {
    let mut record = filled_record();

    process(&mut record).unwrap();

    assert_eq!(record.inner.retries, 3);
    assert_eq!(record.items[0].retries, 7);
    assert_eq!(record.items[1].retries, 3);
}

#[test]
fn blank_required_field_fails_with_field_name() {
    let mut record = filled_record();
    record.f = String::new();

    let err = process(&mut record).unwrap_err();

    assert_eq!(err.to_string(), "F is required, but blank");
    assert!(matches!(err, SchemaError::Required { .. }));
    assert_eq!(err.field(), "F");
}

#[test]
fn nested_required_error_reports_location() {
    let mut record = filled_record();
    record.items[1].name = String::new();

    let err = process(&mut record).unwrap_err();

    assert_eq!(err.to_string(), "name is required, but blank");
    assert_eq!(err.path(), "Items.1.name");
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Ordered {
    first: String,
    second: String,
    third: u32,
}

impl Schema for Ordered {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field("first", &mut self.first, FieldRule::new().with_default("one"))?;
        walker.field("second", &mut self.second, FieldRule::new().required())?;
        walker.field("third", &mut self.third, FieldRule::new().with_default("3"))
    }
}

#[test]
fn first_failure_stops_processing_of_later_fields() {
    let mut record = Ordered::default();

    let err = process(&mut record).unwrap_err();

    assert_eq!(err.field(), "second");
    assert_eq!(record.first, "one");
    assert_eq!(record.third, 0);
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Both {
    mode: String,
}

impl Schema for Both {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field(
            "mode",
            &mut self.mode,
            FieldRule::new().with_default("auto").required(),
        )
    }
}

#[test]
fn default_wins_over_required() {
    let mut record = Both::default();

    process(&mut record).unwrap();

    assert_eq!(record.mode, "auto");
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct StructuredDefaults {
    inner: Inner,
    items: Vec<Inner>,
    tags: Vec<String>,
}

impl Schema for StructuredDefaults {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field(
            "inner",
            &mut self.inner,
            FieldRule::new().with_default("{name: main}"),
        )?;
        walker.field(
            "items",
            &mut self.items,
            FieldRule::new().with_default("[{name: a, retries: 1}, {name: b}]"),
        )?;
        walker.field(
            "tags",
            &mut self.tags,
            FieldRule::new().with_default("[x, y]"),
        )
    }
}

#[test]
fn structured_defaults_are_parsed_then_walked() {
    let mut record = StructuredDefaults::default();

    process(&mut record).unwrap();

    assert_eq!(record.inner.name, "main");
    assert_eq!(record.inner.retries, 3);
    assert_eq!(record.items.len(), 2);
    assert_eq!(record.items[0].retries, 1);
    assert_eq!(record.items[1].name, "b");
    assert_eq!(record.items[1].retries, 3);
    assert_eq!(record.tags, vec!["x".to_string(), "y".to_string()]);
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct BadDefault {
    port: u16,
}

impl Schema for BadDefault {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field("port", &mut self.port, FieldRule::new().with_default("not-a-port"))
    }
}

#[test]
fn unparsable_default_names_the_field() {
    let mut record = BadDefault::default();

    let err = process(&mut record).unwrap_err();

    assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    assert_eq!(err.field(), "port");
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Indirect {
    optional: Option<Inner>,
    boxed: Box<Inner>,
    by_name: BTreeMap<String, Inner>,
}

impl Schema for Indirect {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field("optional", &mut self.optional, FieldRule::NONE)?;
        walker.field("boxed", &mut self.boxed, FieldRule::NONE)?;
        walker.field("by_name", &mut self.by_name, FieldRule::NONE)
    }
}

#[test]
fn unwraps_options_boxes_and_maps() {
    let mut record = Indirect {
        optional: Some(Inner {
            name: "opt".to_string(),
            retries: 0,
        }),
        boxed: Box::new(Inner {
            name: "boxed".to_string(),
            retries: 0,
        }),
        by_name: BTreeMap::from([(
            "db".to_string(),
            Inner {
                name: "db".to_string(),
                retries: 0,
            },
        )]),
    };

    process(&mut record).unwrap();

    assert_eq!(record.optional.as_ref().unwrap().retries, 3);
    assert_eq!(record.boxed.retries, 3);
    assert_eq!(record.by_name["db"].retries, 3);
}

#[test]
fn none_option_is_skipped() {
    let mut record = Indirect {
        boxed: Box::new(Inner {
            name: "boxed".to_string(),
            retries: 1,
        }),
        ..Indirect::default()
    };

    process(&mut record).unwrap();

    assert!(record.optional.is_none());
}

#[test]
fn empty_default_literal_counts_as_absent() {
    let rule = FieldRule::new().with_default("");

    assert_eq!(rule.default_literal(), None);
    assert_eq!(FieldRule::NONE.default_literal(), None);
    assert!(FieldRule::new().required().is_required());
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Ports {
    ports: Vec<u16>,
}

impl Schema for Ports {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        walker.field("ports", &mut self.ports, FieldRule::new().with_default("[80, 443]"))
    }
}

#[test]
fn explicit_empty_sequence_counts_as_blank() {
    let mut record: Ports = serde_json::from_str(r#"{"ports": []}"#).unwrap();

    process(&mut record).unwrap();

    assert_eq!(record.ports, vec![80, 443]);
}
