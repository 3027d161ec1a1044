use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::errors::SchemaError;
use crate::domain::models::{DerivationRule, FieldSpec};

/// Collects field declarations and freezes them into a validated [`Schema`]
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entries: Vec<(FieldSpec, Option<DerivationRule>)>,
}

/// Validated, immutable set of field declarations
///
/// The derivation order is computed once in [`SchemaRegistry::build`] and
/// reused by every resolution pass.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    rules: HashMap<String, DerivationRule>,
    derivation_order: Vec<String>,
}

// Standalone helper for cycle detection over derived fields
fn detect_cycle_util<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> bool {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = graph.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                if detect_cycle_util(neighbor, graph, visited, rec_stack, path) {
                    return true;
                }
            } else if rec_stack.contains(neighbor) {
                if let Some(cycle_start) = path.iter().position(|&name| name == neighbor) {
                    path.drain(0..cycle_start);
                    // close the loop so the report reads a -> b -> a
                    path.push(neighbor);
                    return true;
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    false
}

/// A declared default must be a value the field could have resolved to
fn check_default(spec: &FieldSpec) -> Result<(), SchemaError> {
    let Some(default) = &spec.default else {
        return Ok(());
    };
    let invalid = |expected: String| SchemaError::InvalidDefault {
        name: spec.name.clone(),
        expected,
    };

    if !spec.kind.accepts(default) {
        return Err(invalid(spec.kind.to_string()));
    }
    if let (Some(range), Some(value)) = (&spec.int_range, default.as_int()) {
        if !range.contains(&value) {
            return Err(invalid(format!(
                "int in {}..={}",
                range.start(),
                range.end()
            )));
        }
    }
    Ok(())
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field, optionally computed by a derivation rule
    ///
    /// A field registered with a rule is never read from the environment.
    pub fn register(&mut self, spec: FieldSpec, rule: Option<DerivationRule>) -> &mut Self {
        self.entries.push((spec, rule));
        self
    }

    /// Shorthand for `register(spec, None)`
    pub fn field(&mut self, spec: FieldSpec) -> &mut Self {
        self.register(spec, None)
    }

    /// Shorthand for `register(spec, Some(rule))`
    pub fn derived(&mut self, spec: FieldSpec, rule: DerivationRule) -> &mut Self {
        self.register(spec, Some(rule))
    }

    /// Validate the declarations and freeze them
    ///
    /// Checks, in order: duplicate names, rule targets, unknown inputs, and
    /// cycles among derived fields.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (position, (spec, _)) in self.entries.iter().enumerate() {
            if index.insert(spec.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateField {
                    name: spec.name.clone(),
                });
            }
        }

        for (spec, _) in &self.entries {
            check_default(spec)?;
        }

        for (spec, rule) in &self.entries {
            let Some(rule) = rule else { continue };
            if rule.target != spec.name {
                return Err(SchemaError::RuleTargetMismatch {
                    field: spec.name.clone(),
                    target: rule.target.clone(),
                });
            }
            if let Some(unknown) = rule.inputs.iter().find(|input| !index.contains_key(*input)) {
                return Err(SchemaError::UnknownDependency {
                    field: spec.name.clone(),
                    dependency: unknown.clone(),
                });
            }
        }

        let derivation_order = derivation_order(&self.entries)?;

        let mut fields = Vec::with_capacity(self.entries.len());
        let mut rules = HashMap::new();
        for (spec, rule) in self.entries {
            if let Some(rule) = rule {
                rules.insert(spec.name.clone(), rule);
            }
            fields.push(spec);
        }

        tracing::debug!(
            fields = fields.len(),
            derived = rules.len(),
            "configuration schema built"
        );

        Ok(Schema {
            fields,
            index,
            rules,
            derivation_order,
        })
    }
}

/// Topologically sort derived fields so inputs are computed before dependents
///
/// Whenever several fields are ready, the one registered first is emitted
/// first, so the result never depends on hash iteration order.
fn derivation_order(
    entries: &[(FieldSpec, Option<DerivationRule>)],
) -> Result<Vec<String>, SchemaError> {
    let derived: Vec<(&str, &DerivationRule)> = entries
        .iter()
        .filter_map(|(spec, rule)| rule.as_ref().map(|rule| (spec.name.as_str(), rule)))
        .collect();
    let derived_names: HashSet<&str> = derived.iter().map(|(name, _)| *name).collect();

    // edges point from a derived field to the derived fields it reads
    let graph: HashMap<&str, Vec<&str>> = derived
        .iter()
        .map(|(name, rule)| {
            let deps = rule
                .inputs
                .iter()
                .map(String::as_str)
                .filter(|input| derived_names.contains(input))
                .collect();
            (*name, deps)
        })
        .collect();

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();
    for &(name, _) in &derived {
        if !visited.contains(name)
            && detect_cycle_util(name, &graph, &mut visited, &mut rec_stack, &mut path)
        {
            return Err(SchemaError::CyclicDependency {
                cycle: path.iter().map(|s| (*s).to_string()).collect(),
            });
        }
    }

    // Kahn's algorithm; the ready set is keyed by registration position
    let mut in_degree: Vec<usize> = derived
        .iter()
        .map(|(name, _)| graph.get(name).map_or(0, Vec::len))
        .collect();
    let mut dependents: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, &(name, _)) in derived.iter().enumerate() {
        for &dep in graph.get(name).map_or(&[][..], Vec::as_slice) {
            dependents.entry(dep).or_default().push(i);
        }
    }

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| i)
        .collect();
    let mut sorted = Vec::with_capacity(derived.len());

    while let Some(next) = ready.pop_first() {
        let name = derived[next].0;
        sorted.push(name.to_string());
        for &child in dependents.get(name).map_or(&[][..], Vec::as_slice) {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if sorted.len() != derived.len() {
        let remaining = derived
            .iter()
            .map(|(name, _)| (*name).to_string())
            .filter(|name| !sorted.contains(name))
            .collect();
        return Err(SchemaError::CyclicDependency { cycle: remaining });
    }

    Ok(sorted)
}

impl Schema {
    /// All fields in registration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn rule(&self, name: &str) -> Option<&DerivationRule> {
        self.rules.get(name)
    }

    pub fn is_derived(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Fields read directly from the environment, in registration order
    pub fn environment_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|spec| !self.is_derived(&spec.name))
    }

    /// Derived field names, dependencies first
    pub fn derivation_order(&self) -> &[String] {
        &self.derivation_order
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ConfigValue;

    fn passthrough(target: &str, inputs: &[&str]) -> DerivationRule {
        let first = inputs.first().map(|s| (*s).to_string());
        DerivationRule::new(target, inputs, move |values| {
            first.as_deref().and_then(|name| values.get(name)).cloned()
        })
    }

    #[test]
    fn test_build_empty_schema() {
        let schema = SchemaRegistry::new().build().unwrap();
        assert!(schema.is_empty());
        assert!(schema.derivation_order().is_empty());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut registry = SchemaRegistry::new();
        registry
            .field(FieldSpec::string("DB_HOST"))
            .field(FieldSpec::int("DB_HOST"));

        assert_eq!(
            registry.build().unwrap_err(),
            SchemaError::DuplicateField {
                name: "DB_HOST".to_string()
            }
        );
    }

    #[test]
    fn test_default_of_wrong_kind_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.field(
            FieldSpec::int("WEB_WORKER_NUM")
                .with_range(1..=1024)
                .with_default("sixteen"),
        );

        assert_eq!(
            registry.build().unwrap_err(),
            SchemaError::InvalidDefault {
                name: "WEB_WORKER_NUM".to_string(),
                expected: "int".to_string(),
            }
        );
    }

    #[test]
    fn test_default_outside_enum_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.field(FieldSpec::one_of("LOG_STREAM", &["stdout", "stderr"]).with_default("stdot"));

        assert!(matches!(
            registry.build().unwrap_err(),
            SchemaError::InvalidDefault { name, .. } if name == "LOG_STREAM"
        ));
    }

    #[test]
    fn test_default_outside_range_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.field(FieldSpec::int("DB_PORT").with_range(1..=65535).with_default(0_i64));

        assert_eq!(
            registry.build().unwrap_err(),
            SchemaError::InvalidDefault {
                name: "DB_PORT".to_string(),
                expected: "int in 1..=65535".to_string(),
            }
        );
    }

    #[test]
    fn test_valid_defaults_accepted() {
        let mut registry = SchemaRegistry::new();
        registry
            .field(FieldSpec::int("WEB_WORKER_NUM").with_range(1..=1024).with_default(16_i64))
            .field(FieldSpec::one_of("LOG_STREAM", &["stdout", "stderr"]).with_default("stdout"))
            .field(FieldSpec::bool("VALIDATE_URLS").with_default(false))
            .field(FieldSpec::string_list("VISITS_WEBHOOKS").with_default(Vec::<String>::new()));

        assert_eq!(registry.build().unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.derived(
            FieldSpec::string("database.driver"),
            passthrough("database.driver", &["DB_DRIVER"]),
        );

        assert_eq!(
            registry.build().unwrap_err(),
            SchemaError::UnknownDependency {
                field: "database.driver".to_string(),
                dependency: "DB_DRIVER".to_string(),
            }
        );
    }

    #[test]
    fn test_rule_target_mismatch_rejected() {
        let mut registry = SchemaRegistry::new();
        registry
            .field(FieldSpec::string("A"))
            .derived(FieldSpec::string("b"), passthrough("c", &["A"]));

        assert!(matches!(
            registry.build().unwrap_err(),
            SchemaError::RuleTargetMismatch { field, target } if field == "b" && target == "c"
        ));
    }

    #[test]
    fn test_two_node_cycle_rejected() {
        let mut registry = SchemaRegistry::new();
        registry
            .derived(FieldSpec::string("a"), passthrough("a", &["b"]))
            .derived(FieldSpec::string("b"), passthrough("b", &["a"]));

        match registry.build().unwrap_err() {
            SchemaError::CyclicDependency { cycle } => {
                assert_eq!(cycle, vec!["a", "b", "a"]);
            }
            other => panic!("Expected CyclicDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut registry = SchemaRegistry::new();
        registry.derived(FieldSpec::string("a"), passthrough("a", &["a"]));

        assert_eq!(
            registry.build().unwrap_err(),
            SchemaError::CyclicDependency {
                cycle: vec!["a".to_string(), "a".to_string()]
            }
        );
    }

    #[test]
    fn test_derivation_order_puts_inputs_first() {
        let mut registry = SchemaRegistry::new();
        registry
            .derived(FieldSpec::string("c"), passthrough("c", &["b"]))
            .derived(FieldSpec::string("b"), passthrough("b", &["a"]))
            .field(FieldSpec::string("ROOT"))
            .derived(FieldSpec::string("a"), passthrough("a", &["ROOT"]))
            .derived(FieldSpec::string("z"), passthrough("z", &["ROOT"]));

        let schema = registry.build().unwrap();
        assert_eq!(schema.derivation_order(), &["a", "b", "c", "z"]);
    }

    #[test]
    fn test_ready_fields_follow_registration_order() {
        let mut registry = SchemaRegistry::new();
        registry
            .field(FieldSpec::string("ROOT"))
            .derived(FieldSpec::string("late"), passthrough("late", &["mid"]))
            .derived(FieldSpec::string("mid"), passthrough("mid", &["ROOT"]))
            .derived(FieldSpec::string("other"), passthrough("other", &["ROOT"]));

        let schema = registry.build().unwrap();
        assert_eq!(schema.derivation_order(), &["mid", "late", "other"]);
    }

    #[test]
    fn test_environment_fields_exclude_derived() {
        let mut registry = SchemaRegistry::new();
        registry
            .field(FieldSpec::string("DB_DRIVER").with_default("sqlite"))
            .derived(
                FieldSpec::string("database.driver"),
                passthrough("database.driver", &["DB_DRIVER"]),
            )
            .field(FieldSpec::bool("VALIDATE_URLS"));

        let schema = registry.build().unwrap();
        let names: Vec<_> = schema.environment_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["DB_DRIVER", "VALIDATE_URLS"]);
        assert!(schema.is_derived("database.driver"));
        assert_eq!(
            schema.field("DB_DRIVER").and_then(|f| f.default.clone()),
            Some(ConfigValue::from("sqlite"))
        );
    }
}
