use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::value::ConfigValue;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Read from an environment variable
    Environment,
    /// Field default, variable was absent
    Default,
    /// Computed by a derivation rule
    Derived,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "env"),
            Self::Default => write!(f, "default"),
            Self::Derived => write!(f, "derived"),
        }
    }
}

/// A value in the snapshot together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    pub value: ConfigValue,
    pub source: ValueSource,
}

/// Immutable result of a successful resolution pass
///
/// Cloning is cheap and shares the underlying map. Fields that resolved to no
/// value are not present at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedConfig {
    entries: Arc<BTreeMap<String, ResolvedEntry>>,
}

impl ResolvedConfig {
    pub(crate) fn from_entries(entries: BTreeMap<String, ResolvedEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries.get(name).map(|entry| &entry.value)
    }

    pub fn entry(&self, name: &str) -> Option<&ResolvedEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ConfigValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ConfigValue::as_int)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ConfigValue::as_bool)
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(ConfigValue::as_list)
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
