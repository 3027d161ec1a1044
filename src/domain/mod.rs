//! Domain layer: configuration value model and error taxonomy
//!
//! Nothing in here touches the process environment or global state.

pub mod errors;
pub mod models;

pub use errors::{
    AggregateError, ConfigError, DerivationError, FieldError, ResolveError, SchemaError, REDACTED,
};
