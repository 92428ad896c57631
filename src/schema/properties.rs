//! Per-type constraint sets attached to configuration items.
//!
//! The declared constraints are checked against themselves exactly once, when
//! the properties are attached to an item: a default outside its own bounds or
//! options list is a schema-author bug and fails construction. Per-assignment
//! values are never checked here; [`crate::SharedItem::validate`] reports them.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::value::{ConfigValue, ItemType};

/// Constraints for a boolean item: nullability and a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoolProperties {
    pub allow_null: bool,
    pub default: Option<bool>,
}

impl BoolProperties {
    pub fn new(allow_null: bool, default: Option<bool>) -> Self {
        Self {
            allow_null,
            default,
        }
    }
}

/// Constraints for an integer item. Bounds default to unbounded; each bound
/// carries its own inclusive/exclusive flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntProperties {
    pub allow_null: bool,
    pub default: Option<i64>,
    pub min_val: Option<i64>,
    pub max_val: Option<i64>,
    pub inclusive_min: bool,
    pub inclusive_max: bool,
}

impl IntProperties {
    pub fn new(allow_null: bool, default: Option<i64>) -> Self {
        Self {
            allow_null,
            default,
            min_val: None,
            max_val: None,
            inclusive_min: true,
            inclusive_max: true,
        }
    }

    pub fn with_min(mut self, min: i64, inclusive: bool) -> Self {
        self.min_val = Some(min);
        self.inclusive_min = inclusive;
        self
    }

    pub fn with_max(mut self, max: i64, inclusive: bool) -> Self {
        self.max_val = Some(max);
        self.inclusive_max = inclusive;
        self
    }

    /// Range membership failure for a value, as a message. `None` means the
    /// value sits inside the declared bounds.
    pub(crate) fn check_value(&self, value: i64) -> Option<String> {
        if let Some(min) = self.min_val {
            let below = if self.inclusive_min {
                value < min
            } else {
                value <= min
            };
            if below {
                return Some(if self.inclusive_min {
                    format!("value {value} is below the minimum {min}")
                } else {
                    format!("value {value} must be greater than {min}")
                });
            }
        }
        if let Some(max) = self.max_val {
            let above = if self.inclusive_max {
                value > max
            } else {
                value >= max
            };
            if above {
                return Some(if self.inclusive_max {
                    format!("value {value} is above the maximum {max}")
                } else {
                    format!("value {value} must be less than {max}")
                });
            }
        }
        None
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        if let (Some(min), Some(max)) = (self.min_val, self.max_val) {
            if min > max {
                return Err(SchemaError::InvertedBounds {
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
        if let Some(default) = self.default {
            if self.check_value(default).is_some() {
                return Err(SchemaError::DefaultOutOfBounds {
                    default: default.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Constraints for a float item; same shape as [`IntProperties`] over `f64`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatProperties {
    pub allow_null: bool,
    pub default: Option<f64>,
    pub min_val: Option<f64>,
    pub max_val: Option<f64>,
    pub inclusive_min: bool,
    pub inclusive_max: bool,
}

impl FloatProperties {
    pub fn new(allow_null: bool, default: Option<f64>) -> Self {
        Self {
            allow_null,
            default,
            min_val: None,
            max_val: None,
            inclusive_min: true,
            inclusive_max: true,
        }
    }

    pub fn with_min(mut self, min: f64, inclusive: bool) -> Self {
        self.min_val = Some(min);
        self.inclusive_min = inclusive;
        self
    }

    pub fn with_max(mut self, max: f64, inclusive: bool) -> Self {
        self.max_val = Some(max);
        self.inclusive_max = inclusive;
        self
    }

    pub(crate) fn check_value(&self, value: f64) -> Option<String> {
        if let Some(min) = self.min_val {
            let below = if self.inclusive_min {
                value < min
            } else {
                value <= min
            };
            if below {
                return Some(if self.inclusive_min {
                    format!("value {value} is below the minimum {min}")
                } else {
                    format!("value {value} must be greater than {min}")
                });
            }
        }
        if let Some(max) = self.max_val {
            let above = if self.inclusive_max {
                value > max
            } else {
                value >= max
            };
            if above {
                return Some(if self.inclusive_max {
                    format!("value {value} is above the maximum {max}")
                } else {
                    format!("value {value} must be less than {max}")
                });
            }
        }
        None
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        if let (Some(min), Some(max)) = (self.min_val, self.max_val) {
            if min > max {
                return Err(SchemaError::InvertedBounds {
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
        if let Some(default) = self.default {
            if self.check_value(default).is_some() {
                return Err(SchemaError::DefaultOutOfBounds {
                    default: default.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Constraints for a string item. A non-empty `options` list makes the item
/// categorical: every validated value must be one of the options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrProperties {
    pub allow_null: bool,
    pub default: Option<String>,
    pub options: Vec<String>,
}

impl StrProperties {
    pub fn new(allow_null: bool, default: Option<&str>) -> Self {
        Self {
            allow_null,
            default: default.map(str::to_string),
            options: Vec::new(),
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn check_value(&self, value: &str) -> Option<String> {
        if !self.options.is_empty() && !self.options.iter().any(|o| o == value) {
            return Some(format!("'{value}' is not one of the declared options"));
        }
        None
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        if let Some(default) = &self.default {
            if self.check_value(default).is_some() {
                return Err(SchemaError::DefaultNotAnOption {
                    default: default.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The constraint set attached to an item; the variant decides the item's
/// declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemProperties {
    Bool(BoolProperties),
    Int(IntProperties),
    Float(FloatProperties),
    Str(StrProperties),
}

impl ItemProperties {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemProperties::Bool(_) => ItemType::Bool,
            ItemProperties::Int(_) => ItemType::Int,
            ItemProperties::Float(_) => ItemType::Float,
            ItemProperties::Str(_) => ItemType::Str,
        }
    }

    pub fn allow_null(&self) -> bool {
        match self {
            ItemProperties::Bool(p) => p.allow_null,
            ItemProperties::Int(p) => p.allow_null,
            ItemProperties::Float(p) => p.allow_null,
            ItemProperties::Str(p) => p.allow_null,
        }
    }

    pub fn default_value(&self) -> Option<ConfigValue> {
        match self {
            ItemProperties::Bool(p) => p.default.map(ConfigValue::Bool),
            ItemProperties::Int(p) => p.default.map(ConfigValue::Int),
            ItemProperties::Float(p) => p.default.map(ConfigValue::Float),
            ItemProperties::Str(p) => p.default.clone().map(ConfigValue::Str),
        }
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        match self {
            ItemProperties::Bool(_) => Ok(()),
            ItemProperties::Int(p) => p.check(),
            ItemProperties::Float(p) => p.check(),
            ItemProperties::Str(p) => p.check(),
        }
    }

    /// Constraint failure for an already kind-checked value, as a message.
    pub(crate) fn check_value(&self, value: &ConfigValue) -> Option<String> {
        match self {
            ItemProperties::Bool(_) => None,
            ItemProperties::Int(p) => value.as_int().and_then(|v| p.check_value(v)),
            ItemProperties::Float(p) => value.as_float().and_then(|v| p.check_value(v)),
            ItemProperties::Str(p) => value.as_str().and_then(|v| p.check_value(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_outside_bounds_is_rejected() {
        let props = IntProperties::new(true, Some(0)).with_min(1, true);
        assert!(matches!(
            props.check(),
            Err(SchemaError::DefaultOutOfBounds { .. })
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let props = FloatProperties::new(true, None)
            .with_min(1.0, true)
            .with_max(0.0, true);
        assert!(matches!(
            props.check(),
            Err(SchemaError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn default_must_be_an_option() {
        let props = StrProperties::new(true, Some("purple")).with_options(["red", "blue"]);
        assert!(matches!(
            props.check(),
            Err(SchemaError::DefaultNotAnOption { .. })
        ));
        let props = StrProperties::new(true, Some("red")).with_options(["red", "blue"]);
        assert!(props.check().is_ok());
    }

    #[test]
    fn exclusive_bounds_reject_the_boundary() {
        let props = FloatProperties::new(false, None).with_max(1.0, false);
        assert!(props.check_value(1.0).is_some());
        assert!(props.check_value(0.999).is_none());

        let props = IntProperties::new(false, None).with_min(0, false);
        assert!(props.check_value(0).is_some());
        assert!(props.check_value(1).is_none());
    }

    #[test]
    fn inclusive_bounds_accept_the_boundary() {
        let props = IntProperties::new(false, None)
            .with_min(0, true)
            .with_max(10, true);
        assert!(props.check_value(0).is_none());
        assert!(props.check_value(10).is_none());
        assert!(props.check_value(11).is_some());
    }
}
