/// Errors raised while applying field rules to a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A field marked as required was blank and had no default.
    #[error("{field} is required, but blank")]
    Required {
        /// Declared name of the field.
        field: String,
        /// Dotted location of the field from the record root.
        path: String,
    },

    /// The default literal could not be parsed into the field's type.
    #[error("invalid default '{literal}' for {field}: {details}")]
    InvalidDefault {
        /// Declared name of the field.
        field: String,
        /// Dotted location of the field from the record root.
        path: String,
        /// The literal that failed to parse.
        literal: String,
        /// Parser error details
        details: String,
    },
}

impl SchemaError {
    /// Dotted location of the offending field, e.g. `servers.1.host`.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::Required { path, .. } | SchemaError::InvalidDefault { path, .. } => path,
        }
    }

    /// Declared name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            SchemaError::Required { field, .. } | SchemaError::InvalidDefault { field, .. } => {
                field
            }
        }
    }
}
