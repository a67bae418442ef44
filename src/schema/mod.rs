//! Declarative field rules and the recursive walker that applies them.
//!
//! A record type describes its fields once by implementing [`Schema`]. The
//! [`Walker`] visits those fields in declaration order, fills blank fields
//! from their default literal, rejects blank required fields, and recurses
//! into nested records, sequences, and maps.

mod error;
mod rule;
mod walker;

#[cfg(test)]
mod tests;

pub use error::SchemaError;
pub use rule::FieldRule;
pub use walker::{Schema, Walker, process};
