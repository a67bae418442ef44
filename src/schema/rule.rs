/// Per-field metadata: an optional default literal and a required flag.
///
/// Rules are plain constants, so a record can declare them inline next to
/// each field it visits:
///
/// ```rust
/// use confkeep::schema::FieldRule;
///
/// const PORT: FieldRule = FieldRule::new().with_default("8080");
/// const HOST: FieldRule = FieldRule::new().required();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldRule {
    default: Option<&'static str>,
    required: bool,
}

impl FieldRule {
    /// A rule with neither a default nor a required flag.
    pub const NONE: FieldRule = FieldRule::new();

    /// Creates an empty rule.
    pub const fn new() -> Self {
        Self {
            default: None,
            required: false,
        }
    }

    /// Sets the literal applied when the field is blank.
    ///
    /// The literal is YAML, so scalars need no quoting (`"A"`, `"1"`, `"true"`)
    /// and structures use flow syntax (`"{host: localhost}"`, `"[1, 2]"`).
    pub const fn with_default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    /// Marks the field as required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the default literal, treating an empty literal as absent.
    pub fn default_literal(&self) -> Option<&'static str> {
        self.default.filter(|literal| !literal.is_empty())
    }

    /// Whether a blank value should be rejected.
    pub fn is_required(&self) -> bool {
        self.required
    }
}
