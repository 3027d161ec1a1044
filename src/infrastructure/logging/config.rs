use crate::domain::models::{ConfigValue, LoggingSection};
use crate::infrastructure::env::EnvironmentSource;
use crate::services::field_resolver::FieldResolver;
use crate::services::schema_registry::Schema;
use crate::services::shortener_schema::{LOG_FORMAT, LOG_LEVEL, LOG_STREAM};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (json, pretty)
    pub format: LogFormat,

    /// Stream log lines are written to
    pub stream: LogStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogStream {
    #[default]
    Stdout,
    Stderr,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            stream: LogStream::default(),
        }
    }
}

impl LogConfig {
    /// Logging settings read ahead of the full resolution pass
    ///
    /// Only the `LOG_*` fields are resolved. A setting that is missing from
    /// the schema or fails validation falls back to its built-in default; the
    /// full pass reports it afterwards.
    pub fn bootstrap(schema: &Schema, env: &EnvironmentSource) -> Self {
        let resolver = FieldResolver::new();
        let setting = |name: &str| -> Option<String> {
            let spec = schema.field(name)?;
            match resolver.resolve(spec, env.get(name)) {
                Ok(Some(ConfigValue::String(value))) => Some(value),
                _ => None,
            }
        };

        let defaults = Self::default();
        let section = LoggingSection {
            level: setting(LOG_LEVEL).unwrap_or(defaults.level),
            stream: setting(LOG_STREAM).unwrap_or_else(|| "stdout".to_string()),
            format: setting(LOG_FORMAT).unwrap_or_else(|| "pretty".to_string()),
        };
        Self::from(&section)
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        // values were validated against the enum fields during resolution
        let format = match section.format.as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let stream = match section.stream.as_str() {
            "stderr" => LogStream::Stderr,
            _ => LogStream::Stdout,
        };
        Self {
            level: section.level.clone(),
            format,
            stream,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> LogFormat {
    LogFormat::Pretty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::shortener_schema::build_schema;

    #[test]
    fn test_from_section() {
        let section = LoggingSection {
            level: "debug".to_string(),
            stream: "stderr".to_string(),
            format: "json".to_string(),
        };
        let config = LogConfig::from(&section);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.stream, LogStream::Stderr);
    }

    #[test]
    fn test_bootstrap_reads_logging_fields_only() {
        let schema = build_schema().unwrap();
        let env = EnvironmentSource::from_pairs([
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
            ("WEB_WORKER_NUM", "not a number"),
        ]);
        let config = LogConfig::bootstrap(&schema, &env);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.stream, LogStream::Stdout);
    }

    #[test]
    fn test_bootstrap_falls_back_on_invalid_values() {
        let schema = build_schema().unwrap();
        let env = EnvironmentSource::from_pairs([("LOG_LEVEL", "loud"), ("LOG_STREAM", "stdot")]);
        assert_eq!(LogConfig::bootstrap(&schema, &env), LogConfig::default());
    }

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.stream, LogStream::Stdout);
    }
}
