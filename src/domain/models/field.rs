use std::ops::RangeInclusive;

use super::value::{ConfigValue, FieldKind};

/// Declaration of one configuration field
///
/// Field specs are declared once when the schema is built and never mutated
/// afterwards. The builder methods consume and return `self` so a spec reads
/// as a single expression at the declaration site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name; for environment-backed fields this is the variable name
    pub name: String,
    /// Coercion applied to the raw value
    pub kind: FieldKind,
    /// Value used when the variable is absent
    pub default: Option<ConfigValue>,
    /// Fail resolution when the variable is absent and there is no default
    pub required: bool,
    /// Never echo the raw value in errors, logs, or reports
    pub secret: bool,
    /// Inclusive bounds for `Int` fields
    pub int_range: Option<RangeInclusive<i64>>,
    /// Human description shown by the `show` command
    pub description: String,
}

impl FieldSpec {
    /// Declare a field with the given name and kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            secret: false,
            int_range: None,
            description: String::new(),
        }
    }

    /// Shorthand for a `String` field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Shorthand for an `Int` field
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Int)
    }

    /// Shorthand for a `Bool` field
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    /// Shorthand for a `StringList` field
    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::StringList)
    }

    /// Shorthand for an `Enum` field
    pub fn one_of(name: impl Into<String>, allowed: &[&str]) -> Self {
        Self::new(name, FieldKind::one_of(allowed))
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<ConfigValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: RangeInclusive<i64>) -> Self {
        self.int_range = Some(range);
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
