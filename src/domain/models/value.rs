use serde::Serialize;
use std::fmt;

/// The coercion applied to a raw environment string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Raw string, passed through untouched
    String,
    /// Signed 64-bit integer
    Int,
    /// Boolean from a fixed token set
    Bool,
    /// Comma-separated list of strings
    StringList,
    /// One of a fixed set of strings (case-sensitive)
    Enum(Vec<String>),
}

impl FieldKind {
    /// Build an enum kind from string literals
    pub fn one_of(allowed: &[&str]) -> Self {
        Self::Enum(allowed.iter().map(|s| (*s).to_string()).collect())
    }

    /// Whether `value` is a legal inhabitant of this kind
    pub fn accepts(&self, value: &ConfigValue) -> bool {
        match (self, value) {
            (Self::String, ConfigValue::String(_))
            | (Self::Int, ConfigValue::Int(_))
            | (Self::Bool, ConfigValue::Bool(_))
            | (Self::StringList, ConfigValue::StringList(_)) => true,
            (Self::Enum(allowed), ConfigValue::String(s)) => allowed.iter().any(|a| a == s),
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::StringList => write!(f, "string list"),
            Self::Enum(allowed) => write!(f, "one of [{}]", allowed.join(", ")),
        }
    }
}

/// A resolved, typed configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Text value (also used for validated enum members)
    String(String),
    /// Integer value
    Int(i64),
    /// Boolean value
    Bool(bool),
    /// Ordered list of strings
    StringList(Vec<String>),
}

impl ConfigValue {
    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an int
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean payload, if this is a bool
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in type mismatch errors
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::StringList(_) => "string list",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::StringList(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}
