use std::collections::BTreeMap;

/// Read-only view over a flat `name -> Option<value>` mapping
///
/// Names are case-sensitive. A name mapped to `None` and a name that is not
/// present at all both read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSource {
    vars: BTreeMap<String, Option<String>>,
}

impl EnvironmentSource {
    /// Empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are treated as absent.
    pub fn from_process() -> Self {
        let mut vars = BTreeMap::new();
        for (key, value) in std::env::vars_os() {
            let Some(key) = key.to_str().map(str::to_owned) else {
                tracing::warn!(name = ?key, "skipping environment variable with non UTF-8 name");
                continue;
            };
            let value = value.into_string().ok();
            if value.is_none() {
                tracing::warn!(name = %key, "environment variable has a non UTF-8 value, treating as unset");
            }
            vars.insert(key, value);
        }
        Self { vars }
    }

    /// Build from explicit name/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), Some(value.into()));
        self
    }

    /// Mark a variable as explicitly unset
    #[must_use]
    pub fn without_var(mut self, name: impl Into<String>) -> Self {
        self.vars.insert(name.into(), None);
        self
    }

    /// Raw value of `name`, if set
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(Option::as_deref)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentSource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_sensitive() {
        let env = EnvironmentSource::from_pairs([("DB_HOST", "db")]);
        assert_eq!(env.get("DB_HOST"), Some("db"));
        assert_eq!(env.get("db_host"), None);
    }

    #[test]
    fn test_unset_reads_as_absent() {
        let env = EnvironmentSource::new()
            .with_var("REDIS_SERVERS", "r1")
            .without_var("REDIS_SERVERS");
        assert!(!env.is_set("REDIS_SERVERS"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_empty_string_is_a_value() {
        let env = EnvironmentSource::new().with_var("BASE_PATH", "");
        assert_eq!(env.get("BASE_PATH"), Some(""));
    }

    #[test]
    fn test_from_process_sees_variables() {
        temp_env::with_var("SHORTENER_CONFIG_SOURCE_TEST", Some("42"), || {
            let env = EnvironmentSource::from_process();
            assert_eq!(env.get("SHORTENER_CONFIG_SOURCE_TEST"), Some("42"));
        });
    }
}
