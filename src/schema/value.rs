//! Scalar configuration values and declared item kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared semantic kind of a configuration item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Bool,
    Int,
    Float,
    Str,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Bool => "bool",
            ItemType::Int => "int",
            ItemType::Float => "float",
            ItemType::Str => "str",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw scalar configuration value.
///
/// This is the currency of the engine: items store it, mappings assign it,
/// flat projections export it. Kind checking against the declared [`ItemType`]
/// happens at validation time, never on assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    /// The kind this value carries.
    pub fn kind(&self) -> ItemType {
        match self {
            ConfigValue::Bool(_) => ItemType::Bool,
            ConfigValue::Int(_) => ItemType::Int,
            ConfigValue::Float(_) => ItemType::Float,
            ConfigValue::Str(_) => ItemType::Str,
        }
    }

    /// Kind compatibility with a declared type. Float items accept integers
    /// (the YAML `1` vs `1.0` case); every other cross-kind pairing is a
    /// mismatch.
    pub fn matches(&self, declared: ItemType) -> bool {
        matches!(
            (self, declared),
            (ConfigValue::Bool(_), ItemType::Bool)
                | (ConfigValue::Int(_), ItemType::Int)
                | (ConfigValue::Int(_), ItemType::Float)
                | (ConfigValue::Float(_), ItemType::Float)
                | (ConfigValue::Str(_), ItemType::Str)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers coerce.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Lossless conversion from a JSON scalar. Arrays, objects and `null`
    /// have no scalar representation and map to `None`.
    pub fn from_json(value: &Value) -> Option<ConfigValue> {
        match value {
            Value::Bool(b) => Some(ConfigValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(ConfigValue::Int)
                .or_else(|| n.as_f64().map(ConfigValue::Float)),
            Value::String(s) => Some(ConfigValue::Str(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ConfigValue::Bool(b) => Value::Bool(*b),
            ConfigValue::Int(i) => Value::Number((*i).into()),
            ConfigValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ConfigValue::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Int(i) => write!(f, "{i}"),
            ConfigValue::Float(x) => write!(f, "{x}"),
            ConfigValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}
