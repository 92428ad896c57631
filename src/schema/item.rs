//! Configuration leaves and the shared-cell handle that owns them.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::properties::{
    BoolProperties, FloatProperties, IntProperties, ItemProperties, StrProperties,
};
use crate::schema::validation::{Violation, ViolationCause};
use crate::schema::value::{ConfigValue, ItemType};

/// A single typed, constrained configuration leaf.
///
/// Construction stores the raw value without enforcing constraints; checking
/// is deferred to [`ConfigItem::validate`], which reports instead of raising.
#[derive(Debug, Clone)]
pub struct ConfigItem {
    value: Option<ConfigValue>,
    properties: ItemProperties,
    doc: String,
}

impl ConfigItem {
    /// Build a leaf. The declared constraints are checked against themselves
    /// here, once: a default outside its own bounds fails fast.
    pub fn new(
        value: Option<ConfigValue>,
        properties: ItemProperties,
        doc: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        properties.check()?;
        Ok(Self {
            value,
            properties,
            doc: doc.into(),
        })
    }

    pub fn value(&self) -> Option<&ConfigValue> {
        self.value.as_ref()
    }

    pub fn item_type(&self) -> ItemType {
        self.properties.item_type()
    }

    pub fn properties(&self) -> &ItemProperties {
        &self.properties
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// The value consumers should read: the raw value when set, else the
    /// declared default. `Ok(None)` is a legitimately-null nullable item;
    /// `Err` means the caller asked for a value that provably does not exist.
    pub fn effective_value(&self) -> Result<Option<ConfigValue>, SchemaError> {
        match self
            .value
            .clone()
            .or_else(|| self.properties.default_value())
        {
            Some(value) => Ok(Some(value)),
            None if self.properties.allow_null() => Ok(None),
            None => Err(SchemaError::NullConstraint),
        }
    }

    /// Check the raw value against the declared constraints: null-ability,
    /// then value kind, then bounds or option membership. Zero or one
    /// violation; never an error.
    pub fn validate(&self) -> Option<Violation> {
        let Some(value) = &self.value else {
            if self.properties.allow_null() {
                return None;
            }
            return Some(Violation::new(
                "value is null and the item does not allow null",
                ViolationCause::NullValue,
            ));
        };
        if !value.matches(self.item_type()) {
            return Some(Violation::new(
                format!(
                    "expected a {} value, got {} '{}'",
                    self.item_type(),
                    value.kind(),
                    value
                ),
                ViolationCause::TypeKind,
            ));
        }
        if let Some(message) = self.properties.check_value(value) {
            let cause = match self.item_type() {
                ItemType::Str => ViolationCause::InvalidOption,
                _ => ViolationCause::OutOfRange,
            };
            return Some(Violation::new(message, cause));
        }
        None
    }
}

/// A shared handle to a single owned [`ConfigItem`].
///
/// Cloning the handle never clones the item: every clone observes and mutates
/// the same underlying cell, which is what makes explicit aliasing across
/// groups possible. Identity is the cell, not the path it is reached through.
/// The cell is an `Rc<RefCell<_>>`: the engine is single-threaded by design,
/// with one logical owner mutating configuration at a time.
#[derive(Debug, Clone)]
pub struct SharedItem {
    cell: Rc<RefCell<ConfigItem>>,
}

impl SharedItem {
    pub fn new(item: ConfigItem) -> Self {
        Self {
            cell: Rc::new(RefCell::new(item)),
        }
    }

    pub fn bool(
        value: Option<bool>,
        properties: BoolProperties,
        doc: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Ok(Self::new(ConfigItem::new(
            value.map(ConfigValue::Bool),
            ItemProperties::Bool(properties),
            doc,
        )?))
    }

    pub fn int(
        value: Option<i64>,
        properties: IntProperties,
        doc: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Ok(Self::new(ConfigItem::new(
            value.map(ConfigValue::Int),
            ItemProperties::Int(properties),
            doc,
        )?))
    }

    pub fn float(
        value: Option<f64>,
        properties: FloatProperties,
        doc: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Ok(Self::new(ConfigItem::new(
            value.map(ConfigValue::Float),
            ItemProperties::Float(properties),
            doc,
        )?))
    }

    pub fn string(
        value: Option<&str>,
        properties: StrProperties,
        doc: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Ok(Self::new(ConfigItem::new(
            value.map(ConfigValue::from),
            ItemProperties::Str(properties),
            doc,
        )?))
    }

    pub fn value(&self) -> Option<ConfigValue> {
        self.cell.borrow().value.clone()
    }

    /// Plain mutation; no re-validation happens here.
    pub fn set_value(&self, value: Option<ConfigValue>) {
        self.cell.borrow_mut().value = value;
    }

    /// Assign from a JSON scalar. `null` clears the value. Returns `false`
    /// when the supplied value has no scalar representation (arrays,
    /// objects), leaving the current value untouched.
    pub fn set_json(&self, value: &Value) -> bool {
        if value.is_null() {
            self.cell.borrow_mut().value = None;
            return true;
        }
        match ConfigValue::from_json(value) {
            Some(converted) => {
                self.cell.borrow_mut().value = Some(converted);
                true
            }
            None => false,
        }
    }

    pub fn item_type(&self) -> ItemType {
        self.cell.borrow().item_type()
    }

    pub fn doc(&self) -> String {
        self.cell.borrow().doc.clone()
    }

    pub fn effective_value(&self) -> Result<Option<ConfigValue>, SchemaError> {
        self.cell.borrow().effective_value()
    }

    /// Effective boolean view; anything that is not an effective `true` reads
    /// as `false`. Rule predicates lean on this for capability flags.
    pub fn effective_bool(&self) -> bool {
        matches!(
            self.effective_value(),
            Ok(Some(ConfigValue::Bool(true)))
        )
    }

    pub fn effective_int(&self) -> Option<i64> {
        self.effective_value().ok().flatten().and_then(|v| v.as_int())
    }

    /// Effective numeric view; integers coerce.
    pub fn effective_float(&self) -> Option<f64> {
        self.effective_value()
            .ok()
            .flatten()
            .and_then(|v| v.as_float())
    }

    pub fn validate(&self) -> Option<Violation> {
        self.cell.borrow().validate()
    }

    /// Cell identity: true exactly when both handles observe one item.
    pub fn same_cell(&self, other: &SharedItem) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Stable identity of the underlying cell, used to de-duplicate aliased
    /// items during a validation walk.
    pub(crate) fn cell_id(&self) -> usize {
        Rc::as_ptr(&self.cell) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chance() -> FloatProperties {
        FloatProperties::new(true, Some(0.5))
            .with_min(0.0, true)
            .with_max(1.0, true)
    }

    #[test]
    fn null_non_nullable_item_yields_exactly_one_violation() {
        let item = SharedItem::bool(None, BoolProperties::new(false, Some(false)), "flag").unwrap();
        let violation = item.validate().expect("null must violate");
        assert_eq!(violation.cause, ViolationCause::NullValue);
    }

    #[test]
    fn null_nullable_item_is_clean_and_reads_its_default() {
        let item = SharedItem::float(None, chance(), "chance").unwrap();
        assert!(item.validate().is_none());
        assert_eq!(item.effective_float(), Some(0.5));
        assert_eq!(item.value(), None);
    }

    #[test]
    fn effective_value_errors_only_when_nothing_exists() {
        let item = SharedItem::int(None, IntProperties::new(false, None), "count").unwrap();
        assert!(matches!(
            item.effective_value(),
            Err(SchemaError::NullConstraint)
        ));

        let item = SharedItem::int(None, IntProperties::new(false, Some(3)), "count").unwrap();
        assert_eq!(item.effective_int(), Some(3));
    }

    #[test]
    fn kind_mismatch_is_reported_not_raised() {
        let item = SharedItem::int(None, IntProperties::new(true, None), "count").unwrap();
        assert!(item.set_json(&json!("three")));
        let violation = item.validate().expect("string for int must violate");
        assert_eq!(violation.cause, ViolationCause::TypeKind);
    }

    #[test]
    fn float_item_accepts_an_integer_assignment() {
        let item = SharedItem::float(None, chance(), "chance").unwrap();
        assert!(item.set_json(&json!(1)));
        assert!(item.validate().is_none());
        assert_eq!(item.effective_float(), Some(1.0));
    }

    #[test]
    fn out_of_range_assignment_is_reported() {
        let item = SharedItem::float(Some(1.5), chance(), "chance").unwrap();
        let violation = item.validate().expect("1.5 is out of range");
        assert_eq!(violation.cause, ViolationCause::OutOfRange);
    }

    #[test]
    fn categorical_membership_is_enforced() {
        let props = StrProperties::new(true, Some("low")).with_options(["low", "high"]);
        let item = SharedItem::string(Some("medium"), props, "intensity").unwrap();
        let violation = item.validate().expect("not an option");
        assert_eq!(violation.cause, ViolationCause::InvalidOption);
    }

    #[test]
    fn json_null_clears_the_value() {
        let item = SharedItem::int(Some(2), IntProperties::new(true, Some(1)), "count").unwrap();
        assert!(item.set_json(&json!(null)));
        assert_eq!(item.value(), None);
        assert_eq!(item.effective_int(), Some(1));
    }

    #[test]
    fn non_scalar_assignment_is_refused_and_leaves_the_value() {
        let item = SharedItem::int(Some(2), IntProperties::new(true, None), "count").unwrap();
        assert!(!item.set_json(&json!({"nested": true})));
        assert_eq!(item.value(), Some(ConfigValue::Int(2)));
    }

    #[test]
    fn clones_share_one_cell() {
        let a = SharedItem::float(None, chance(), "chance").unwrap();
        let b = a.clone();
        b.set_value(Some(ConfigValue::Float(0.9)));
        assert_eq!(a.value(), Some(ConfigValue::Float(0.9)));
        assert!(a.same_cell(&b));

        let c = SharedItem::float(None, chance(), "chance").unwrap();
        assert!(!a.same_cell(&c));
    }

    #[test]
    fn bad_default_fails_item_construction() {
        let result = SharedItem::int(
            None,
            IntProperties::new(true, Some(-1)).with_min(0, true),
            "count",
        );
        assert!(matches!(
            result,
            Err(SchemaError::DefaultOutOfBounds { .. })
        ));
    }
}
