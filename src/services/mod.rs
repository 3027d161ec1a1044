pub mod config_resolver;
pub mod derived_rule_engine;
pub mod field_resolver;
pub mod schema_registry;
pub mod shortener_schema;

pub use config_resolver::{resolve, ConfigResolver, ResolutionState};
pub use derived_rule_engine::{DerivedRuleEngine, ResolvedValues};
pub use field_resolver::FieldResolver;
pub use schema_registry::{Schema, SchemaRegistry};
