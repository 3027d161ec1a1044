//! shortener-config - typed environment configuration for the URL shortener
//!
//! Every setting the service reads at startup is declared once as a field in a
//! schema. A resolution pass reads the environment, coerces each raw value to
//! its declared type, reports every invalid field together, then computes the
//! derived sections (database connection, cache backend and its aliases) from
//! the resolved inputs.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): field declarations, values, snapshots and errors
//! - **Service Layer** (`services`): schema registry, coercion, derivation and the resolution pass
//! - **Infrastructure Layer** (`infrastructure`): environment access, typed loading, snapshot reload and logging
//! - **CLI Layer** (`cli`): `check` and `show` commands
//!
//! # Example
//!
//! ```no_run
//! use shortener_config::ConfigLoader;
//!
//! let config = ConfigLoader::load()?;
//! println!("database driver: {}", config.database.driver);
//! # Ok::<(), shortener_config::ConfigError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{
    AggregateError, ConfigError, DerivationError, FieldError, ResolveError, SchemaError, REDACTED,
};
pub use domain::models::{
    AppConfig, ConfigValue, DerivationInputs, DerivationRule, FieldKind, FieldSpec,
    ResolvedConfig, ResolvedEntry, ValueSource,
};
pub use infrastructure::config::{ConfigHandle, ConfigLoader};
pub use infrastructure::env::EnvironmentSource;
pub use services::{resolve, ConfigResolver, ResolutionState, Schema, SchemaRegistry};
