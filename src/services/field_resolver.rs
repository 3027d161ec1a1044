use crate::domain::errors::{FieldError, REDACTED};
use crate::domain::models::{ConfigValue, FieldKind, FieldSpec};

/// Tokens accepted as `true` (compared case-insensitively)
pub const TRUTHY_TOKENS: &[&str] = &["1", "true", "on", "yes"];
/// Tokens accepted as `false` (compared case-insensitively)
pub const FALSY_TOKENS: &[&str] = &["0", "false", "off", "no"];
/// Separator for `StringList` fields
pub const LIST_DELIMITER: char = ',';

/// Resolves one field from its raw environment value
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldResolver;

impl FieldResolver {
    pub fn new() -> Self {
        Self
    }

    /// Apply default, coercion, and validation to one raw value
    ///
    /// `Ok(None)` means the field is optional and has no value.
    pub fn resolve(
        &self,
        spec: &FieldSpec,
        raw: Option<&str>,
    ) -> Result<Option<ConfigValue>, FieldError> {
        let Some(raw) = raw else {
            return Self::resolve_absent(spec);
        };

        let value = match &spec.kind {
            FieldKind::String => ConfigValue::String(raw.to_string()),
            FieldKind::Int => ConfigValue::Int(Self::coerce_int(spec, raw)?),
            FieldKind::Bool => ConfigValue::Bool(Self::coerce_bool(spec, raw)?),
            FieldKind::StringList => ConfigValue::StringList(split_list(raw)),
            FieldKind::Enum(allowed) => {
                if !allowed.iter().any(|candidate| candidate == raw) {
                    return Err(FieldError::InvalidEnumValue {
                        name: spec.name.clone(),
                        raw: shown(spec, raw),
                        allowed: allowed.clone(),
                    });
                }
                ConfigValue::String(raw.to_string())
            }
        };

        Ok(Some(value))
    }

    fn resolve_absent(spec: &FieldSpec) -> Result<Option<ConfigValue>, FieldError> {
        if let Some(default) = &spec.default {
            return Ok(Some(default.clone()));
        }
        if spec.kind == FieldKind::StringList {
            return Ok(Some(ConfigValue::StringList(Vec::new())));
        }
        if spec.required {
            return Err(FieldError::MissingRequiredField {
                name: spec.name.clone(),
            });
        }
        Ok(None)
    }

    fn coerce_int(spec: &FieldSpec, raw: &str) -> Result<i64, FieldError> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| FieldError::InvalidIntFormat {
                name: spec.name.clone(),
                raw: shown(spec, raw),
            })?;

        if let Some(range) = &spec.int_range {
            if !range.contains(&value) {
                return Err(FieldError::IntOutOfRange {
                    name: spec.name.clone(),
                    value: shown(spec, &value.to_string()),
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        Ok(value)
    }

    fn coerce_bool(spec: &FieldSpec, raw: &str) -> Result<bool, FieldError> {
        let token = raw.trim();
        if TRUTHY_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Ok(true)
        } else if FALSY_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Ok(false)
        } else {
            Err(FieldError::InvalidBoolFormat {
                name: spec.name.clone(),
                raw: shown(spec, raw),
            })
        }
    }
}

/// Split on the list delimiter, trimming entries and dropping empty ones
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn shown(spec: &FieldSpec, raw: &str) -> String {
    if spec.secret {
        REDACTED.to_string()
    } else {
        raw.to_string()
    }
}
