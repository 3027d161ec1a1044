use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::{AggregateError, ResolveError, REDACTED};
use crate::domain::models::{ResolvedConfig, ResolvedEntry, ValueSource};
use crate::infrastructure::env::EnvironmentSource;
use crate::services::derived_rule_engine::{DerivedRuleEngine, ResolvedValues};
use crate::services::field_resolver::FieldResolver;
use crate::services::schema_registry::Schema;

/// Lifecycle of a single resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Uninitialized,
    Resolving,
    Resolved,
    Failed,
}

impl ResolutionState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Resolving => write!(f, "resolving"),
            Self::Resolved => write!(f, "resolved"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Orchestrates one resolution pass over a schema
///
/// A resolver runs exactly once. Both outcomes are terminal; resolving again
/// means building a new resolver from scratch.
#[derive(Debug)]
pub struct ConfigResolver<'s> {
    schema: &'s Schema,
    fields: FieldResolver,
    engine: DerivedRuleEngine,
    state: ResolutionState,
}

impl<'s> ConfigResolver<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            fields: FieldResolver::new(),
            engine: DerivedRuleEngine::new(),
            state: ResolutionState::Uninitialized,
        }
    }

    pub const fn state(&self) -> ResolutionState {
        self.state
    }

    /// Resolve every field against `env`
    ///
    /// All field errors are collected before failing. Derivation only runs
    /// when every environment-backed field resolved.
    pub fn resolve(&mut self, env: &EnvironmentSource) -> Result<ResolvedConfig, ResolveError> {
        if self.state != ResolutionState::Uninitialized {
            return Err(ResolveError::AlreadyResolved);
        }
        self.state = ResolutionState::Resolving;

        let result = self.run(env);
        self.state = if result.is_ok() {
            ResolutionState::Resolved
        } else {
            ResolutionState::Failed
        };

        match &result {
            Ok(config) => tracing::info!(
                fields = self.schema.len(),
                resolved = config.len(),
                "configuration resolved"
            ),
            Err(ResolveError::Fields(aggregate)) => tracing::warn!(
                errors = aggregate.len(),
                fields = ?aggregate.fields(),
                "configuration rejected"
            ),
            Err(error) => tracing::error!(error = %error, "configuration derivation failed"),
        }

        result
    }

    fn run(&self, env: &EnvironmentSource) -> Result<ResolvedConfig, ResolveError> {
        let mut values = ResolvedValues::new();
        let mut sources = BTreeMap::new();
        let mut errors = Vec::new();

        for spec in self.schema.environment_fields() {
            let raw = env.get(&spec.name);
            match self.fields.resolve(spec, raw) {
                Ok(value) => {
                    tracing::debug!(
                        field = %spec.name,
                        value = ?value.as_ref().map(|v| if spec.secret { REDACTED.to_string() } else { v.to_string() }),
                        from_env = raw.is_some(),
                        "field resolved"
                    );
                    let source = if raw.is_some() {
                        ValueSource::Environment
                    } else {
                        ValueSource::Default
                    };
                    sources.insert(spec.name.clone(), source);
                    values.insert(spec.name.clone(), value);
                }
                Err(error) => errors.push(error),
            }
        }

        if !errors.is_empty() {
            return Err(AggregateError::new(errors).into());
        }

        let values = self.engine.apply_all(self.schema, values)?;

        let entries = values
            .into_iter()
            .filter_map(|(name, value)| {
                let value = value?;
                let source = sources
                    .get(&name)
                    .copied()
                    .unwrap_or(ValueSource::Derived);
                Some((name, ResolvedEntry { value, source }))
            })
            .collect();

        Ok(ResolvedConfig::from_entries(entries))
    }
}

/// Run a fresh resolution pass
pub fn resolve(schema: &Schema, env: &EnvironmentSource) -> Result<ResolvedConfig, ResolveError> {
    ConfigResolver::new(schema).resolve(env)
}
