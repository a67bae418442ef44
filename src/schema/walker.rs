use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use serde::de::DeserializeOwned;
use tracing::trace;

use super::{FieldRule, SchemaError};

/// A type whose fields can be visited by a [`Walker`].
///
/// Leaf types (strings, numbers, booleans, raw JSON values) keep the default
/// no-op implementation. Records list their fields in declaration order:
///
/// ```rust
/// use confkeep::schema::{FieldRule, Schema, SchemaError, Walker};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl Schema for Server {
///     fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
///         walker.field("host", &mut self.host, FieldRule::new().required())?;
///         walker.field("port", &mut self.port, FieldRule::new().with_default("8080"))
///     }
/// }
/// ```
pub trait Schema {
    /// Visits every field of `self` through `walker`.
    ///
    /// # Errors
    /// Returns the first [`SchemaError`] raised by a field rule.
    fn walk_fields(&mut self, _walker: &mut Walker) -> Result<(), SchemaError> {
        Ok(())
    }
}

/// Applies default values and required checks to every field of `record`.
///
/// Processing stops at the first failing field; fields declared after it are
/// left exactly as they were.
///
/// # Errors
/// Returns [`SchemaError::Required`] for a blank required field without a
/// default, or [`SchemaError::InvalidDefault`] when a default literal cannot be
/// parsed into the field's type.
pub fn process<T: Schema + ?Sized>(record: &mut T) -> Result<(), SchemaError> {
    let mut walker = Walker::new();
    record.walk_fields(&mut walker)
}

/// Recursive visitor that enforces [`FieldRule`]s.
///
/// Tracks the dotted location of the field being visited so errors can point
/// into nested records and sequences.
#[derive(Debug, Default)]
pub struct Walker {
    segments: Vec<String>,
}

impl Walker {
    /// Creates a walker positioned at the record root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dotted location of the field currently being visited.
    pub fn path(&self) -> String {
        self.segments.join(".")
    }

    /// Visits one field.
    ///
    /// A field is blank when it equals `T::default()`. A blank field takes its
    /// default literal when one is declared, otherwise a blank required field
    /// fails. The value is then walked regardless, so nested records and
    /// sequences of records get their own rules applied.
    ///
    /// # Errors
    /// Returns the first [`SchemaError`] raised by this field or anything
    /// nested inside it.
    pub fn field<T>(
        &mut self,
        name: &str,
        value: &mut T,
        rule: FieldRule,
    ) -> Result<(), SchemaError>
    where
        T: Schema + Default + PartialEq + DeserializeOwned,
    {
        self.segments.push(name.to_string());
        let result = self
            .apply_rule(name, value, rule)
            .and_then(|()| value.walk_fields(self));
        self.segments.pop();
        result
    }

    /// Runs `visit` with `segment` appended to the current location.
    ///
    /// Container implementations use this to label elements by index or key.
    ///
    /// # Errors
    /// Propagates whatever `visit` returns.
    pub fn scope<F>(&mut self, segment: &str, visit: F) -> Result<(), SchemaError>
    where
        F: FnOnce(&mut Self) -> Result<(), SchemaError>,
    {
        self.segments.push(segment.to_string());
        let result = visit(self);
        self.segments.pop();
        result
    }

    fn apply_rule<T>(&self, name: &str, value: &mut T, rule: FieldRule) -> Result<(), SchemaError>
    where
        T: Default + PartialEq + DeserializeOwned,
    {
        if *value != T::default() {
            return Ok(());
        }

        if let Some(literal) = rule.default_literal() {
            *value = serde_yaml::from_str(literal).map_err(|e| SchemaError::InvalidDefault {
                field: name.to_string(),
                path: self.path(),
                literal: literal.to_string(),
                details: e.to_string(),
            })?;
            trace!(field = %self.path(), literal, "Applied default value");
        } else if rule.is_required() {
            return Err(SchemaError::Required {
                field: name.to_string(),
                path: self.path(),
            });
        }

        Ok(())
    }
}

macro_rules! leaf_schema {
    ($($ty:ty),+ $(,)?) => {
        $(impl Schema for $ty {})+
    };
}

leaf_schema!(
    String,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    PathBuf,
    serde_json::Value,
);

impl<T: Schema> Schema for Vec<T> {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        for (index, item) in self.iter_mut().enumerate() {
            walker.scope(&index.to_string(), |w| item.walk_fields(w))?;
        }
        Ok(())
    }
}

impl<T: Schema> Schema for Option<T> {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        match self {
            Some(inner) => inner.walk_fields(walker),
            None => Ok(()),
        }
    }
}

impl<T: Schema + ?Sized> Schema for Box<T> {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        (**self).walk_fields(walker)
    }
}

impl<T: Schema, S> Schema for HashMap<String, T, S> {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        for (key, item) in self.iter_mut() {
            walker.scope(key, |w| item.walk_fields(w))?;
        }
        Ok(())
    }
}

impl<T: Schema> Schema for BTreeMap<String, T> {
    fn walk_fields(&mut self, walker: &mut Walker) -> Result<(), SchemaError> {
        for (key, item) in self.iter_mut() {
            walker.scope(key, |w| item.walk_fields(w))?;
        }
        Ok(())
    }
}
