use std::collections::BTreeMap;

use crate::domain::errors::DerivationError;
use crate::domain::models::{ConfigValue, DerivationInputs};
use crate::services::schema_registry::Schema;

/// Working map of one resolution pass
///
/// Every field that has been through resolution has an entry; `None` marks a
/// field that resolved to no value.
pub type ResolvedValues = BTreeMap<String, Option<ConfigValue>>;

/// Computes derived fields in the schema's precomputed order
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedRuleEngine;

impl DerivedRuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run every derivation rule and insert its target into `resolved`
    pub fn apply_all(
        &self,
        schema: &Schema,
        mut resolved: ResolvedValues,
    ) -> Result<ResolvedValues, DerivationError> {
        for target in schema.derivation_order() {
            let Some(rule) = schema.rule(target) else {
                continue;
            };

            let value = {
                let mut gathered = Vec::with_capacity(rule.inputs.len());
                for input in &rule.inputs {
                    let Some(value) = resolved.get(input) else {
                        return Err(DerivationError::MissingDerivationInput {
                            target: target.clone(),
                            missing: input.clone(),
                        });
                    };
                    gathered.push((input.as_str(), value.as_ref()));
                }
                rule.compute(&DerivationInputs::new(gathered))
            };

            if let (Some(value), Some(spec)) = (&value, schema.field(target)) {
                if !spec.kind.accepts(value) {
                    return Err(DerivationError::DerivedKindMismatch {
                        target: target.clone(),
                        expected: spec.kind.to_string(),
                        found: value.type_name().to_string(),
                    });
                }
            }

            tracing::trace!(field = %target, present = value.is_some(), "derived field computed");
            resolved.insert(target.clone(), value);
        }

        Ok(resolved)
    }
}
