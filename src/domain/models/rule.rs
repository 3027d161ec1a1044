use std::fmt;
use std::sync::Arc;

use super::value::ConfigValue;

type ComputeFn = dyn Fn(&DerivationInputs<'_>) -> Option<ConfigValue> + Send + Sync;

/// A pure function computing one field from other resolved fields
///
/// Returning `None` from `compute` means the target has no value; it is then
/// omitted from the resolved snapshot.
#[derive(Clone)]
pub struct DerivationRule {
    /// Field this rule produces
    pub target: String,
    /// Fields read by the rule, in the order they are declared
    pub inputs: Vec<String>,
    compute: Arc<ComputeFn>,
}

impl DerivationRule {
    pub fn new<F>(target: impl Into<String>, inputs: &[&str], compute: F) -> Self
    where
        F: Fn(&DerivationInputs<'_>) -> Option<ConfigValue> + Send + Sync + 'static,
    {
        Self {
            target: target.into(),
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
            compute: Arc::new(compute),
        }
    }

    /// Run the rule against already gathered inputs
    pub fn compute(&self, inputs: &DerivationInputs<'_>) -> Option<ConfigValue> {
        (self.compute)(inputs)
    }
}

impl fmt::Debug for DerivationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRule")
            .field("target", &self.target)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Resolved input values handed to a rule
///
/// Every declared input is present; its value is `None` when the input
/// resolved to "no value".
#[derive(Debug, Default)]
pub struct DerivationInputs<'a> {
    values: Vec<(&'a str, Option<&'a ConfigValue>)>,
}

impl<'a> DerivationInputs<'a> {
    pub fn new(values: Vec<(&'a str, Option<&'a ConfigValue>)>) -> Self {
        Self { values }
    }

    /// Value of the named input, if it has one
    pub fn get(&self, name: &str) -> Option<&'a ConfigValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, value)| *value)
    }

    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(ConfigValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ConfigValue::as_int)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ConfigValue::as_bool)
    }

    pub fn list(&self, name: &str) -> Option<&'a [String]> {
        self.get(name).and_then(ConfigValue::as_list)
    }
}
