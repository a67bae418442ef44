use serde_json::Value;

use super::path_ops::navigate_path;

/// Immutable snapshot of the most recently accepted config file content.
///
/// Every reload produces a new snapshot; readers holding an older one keep a
/// consistent view while the store moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    raw: Vec<u8>,
    value: Value,
}

impl Document {
    /// Parses raw bytes, rejecting anything that is not syntactically valid JSON.
    ///
    /// # Errors
    /// Returns the parser error for malformed input.
    pub fn parse(raw: Vec<u8>) -> Result<Self, serde_json::Error> {
        let value = serde_json::from_slice(&raw)?;
        Ok(Self { raw, value })
    }

    /// The bytes exactly as read from disk.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The parsed JSON tree.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Extracts the value at `path`, or `None` if nothing is there.
    ///
    /// See [`ConfigStore::watch`](super::ConfigStore::watch) for the path syntax.
    pub fn get(&self, path: &str) -> Option<Value> {
        navigate_path(&self.value, path)
    }
}
