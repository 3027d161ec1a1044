//! Error taxonomy for schema authoring, field resolution, and derivation.

use thiserror::Error;

/// Placeholder printed instead of a secret raw value
pub const REDACTED: &str = "[REDACTED]";

/// Authoring-time schema errors, raised by `SchemaRegistry::build`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field {name} is declared more than once")]
    DuplicateField { name: String },

    #[error("Default of field {name} is not a valid {expected}")]
    InvalidDefault { name: String, expected: String },

    #[error("Derivation rule for {target} is registered on field {field}")]
    RuleTargetMismatch { field: String, target: String },

    #[error("Field {field} depends on undeclared field {dependency}")]
    UnknownDependency { field: String, dependency: String },

    #[error("Cyclic derivation dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}

/// Per-field resolution failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{name}: required but not set")]
    MissingRequiredField { name: String },

    #[error("{name}: expected an integer, got {raw:?}")]
    InvalidIntFormat { name: String, raw: String },

    #[error("{name}: {value} is outside the allowed range {min}..={max}")]
    IntOutOfRange {
        name: String,
        /// Offending value as shown to the operator, redacted for secrets
        value: String,
        min: i64,
        max: i64,
    },

    #[error("{name}: expected a boolean (1/true/on/yes or 0/false/off/no), got {raw:?}")]
    InvalidBoolFormat { name: String, raw: String },

    #[error("{name}: {raw:?} is not one of [{}]", .allowed.join(", "))]
    InvalidEnumValue {
        name: String,
        raw: String,
        allowed: Vec<String>,
    },
}

impl FieldError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequiredField { name }
            | Self::InvalidIntFormat { name, .. }
            | Self::IntOutOfRange { name, .. }
            | Self::InvalidBoolFormat { name, .. }
            | Self::InvalidEnumValue { name, .. } => name,
        }
    }
}

/// Every field error of one resolution pass, in schema order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render_report(.errors))]
pub struct AggregateError {
    pub errors: Vec<FieldError>,
}

impl AggregateError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the offending fields
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(FieldError::field).collect()
    }
}

fn render_report(errors: &[FieldError]) -> String {
    let mut report = format!("{} invalid configuration field(s):", errors.len());
    for error in errors {
        report.push_str("\n  - ");
        report.push_str(&error.to_string());
    }
    report
}

/// Derivation failure; indicates a schema bug rather than bad input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Derivation of {target} is missing input {missing}")]
    MissingDerivationInput { target: String, missing: String },

    #[error("Derivation of {target} produced a {found}, expected {expected}")]
    DerivedKindMismatch {
        target: String,
        expected: String,
        found: String,
    },
}

/// Failure of a whole resolution pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Fields(#[from] AggregateError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error("Resolver already ran; build a new one to resolve again")]
    AlreadyResolved,
}

/// Top-level configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration schema: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Resolved configuration is missing {field}")]
    MissingField { field: String },

    #[error("Resolved field {field} is not a {expected}")]
    FieldType { field: String, expected: String },
}
