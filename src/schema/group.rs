//! Named composites of items and nested groups, with cross-field rules.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SchemaError;
use crate::schema::item::SharedItem;
use crate::schema::validation::{ValidationReport, Violation, ViolationCause};

/// A child slot in a group: a shared leaf item or a nested group.
#[derive(Debug)]
pub enum ConfigNode {
    Item(SharedItem),
    Group(ConfigGroup),
}

/// A cross-field rule: a named predicate over its group's already-populated
/// children, producing at most one violation message.
///
/// Rules are pure: each produces its own message at the point of failure and
/// never touches state shared with another rule, so one failing rule cannot
/// contaminate or suppress the next.
pub struct GroupRule {
    name: String,
    check: Box<dyn Fn(&ConfigGroup) -> Option<String>>,
}

impl GroupRule {
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&ConfigGroup) -> Option<String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for GroupRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupRule").field("name", &self.name).finish()
    }
}

/// A named composite of items and nested groups.
///
/// Children live in an explicit, insertion-ordered registry of
/// `(name, child)` pairs declared through the builder; there is no runtime
/// reflection anywhere. A group owns its children exclusively unless an item
/// is deliberately aliased in through [`ConfigGroup::alias_item`].
#[derive(Debug, Default)]
pub struct ConfigGroup {
    doc: String,
    children: Vec<(String, ConfigNode)>,
    rules: Vec<GroupRule>,
}

impl ConfigGroup {
    pub fn new(doc: impl Into<String>) -> Self {
        Self {
            doc: doc.into(),
            children: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Declare a leaf child. Re-declaring a name replaces the earlier child.
    pub fn with_item(mut self, name: impl Into<String>, item: SharedItem) -> Self {
        self.insert(name.into(), ConfigNode::Item(item));
        self
    }

    /// Declare a nested group child, which may itself be a pre-built
    /// sub-group shared as a construction pattern.
    pub fn with_group(mut self, name: impl Into<String>, group: ConfigGroup) -> Self {
        self.insert(name.into(), ConfigNode::Group(group));
        self
    }

    /// Declare a cross-field rule over this group's children.
    pub fn with_rule(
        mut self,
        name: impl Into<String>,
        check: impl Fn(&ConfigGroup) -> Option<String> + 'static,
    ) -> Self {
        self.rules.push(GroupRule::new(name, check));
        self
    }

    fn insert(&mut self, name: String, node: ConfigNode) {
        match self.children.iter().position(|(n, _)| *n == name) {
            Some(index) => self.children[index].1 = node,
            None => self.children.push((name, node)),
        }
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Declared children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn rules(&self) -> impl Iterator<Item = &GroupRule> {
        self.rules.iter()
    }

    fn node(&self, name: &str) -> Option<&ConfigNode> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    fn node_mut(&mut self, name: &str) -> Option<&mut ConfigNode> {
        self.children
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    fn node_at(&self, path: &str) -> Option<&ConfigNode> {
        match path.split_once('.') {
            None => self.node(path),
            Some((head, rest)) => match self.node(head)? {
                ConfigNode::Group(group) => group.node_at(rest),
                ConfigNode::Item(_) => None,
            },
        }
    }

    fn node_at_mut(&mut self, path: &str) -> Option<&mut ConfigNode> {
        match path.split_once('.') {
            None => self.node_mut(path),
            Some((head, rest)) => match self.node_mut(head)? {
                ConfigNode::Group(group) => group.node_at_mut(rest),
                ConfigNode::Item(_) => None,
            },
        }
    }

    /// A directly declared leaf child.
    pub fn item(&self, name: &str) -> Option<&SharedItem> {
        match self.node(name)? {
            ConfigNode::Item(item) => Some(item),
            ConfigNode::Group(_) => None,
        }
    }

    /// A directly declared nested group.
    pub fn group(&self, name: &str) -> Option<&ConfigGroup> {
        match self.node(name)? {
            ConfigNode::Group(group) => Some(group),
            ConfigNode::Item(_) => None,
        }
    }

    /// A leaf reached through a dotted path.
    pub fn item_at(&self, path: &str) -> Option<&SharedItem> {
        match self.node_at(path)? {
            ConfigNode::Item(item) => Some(item),
            ConfigNode::Group(_) => None,
        }
    }

    /// Effective boolean at a dotted path; missing paths read as `false`.
    pub fn bool_value(&self, path: &str) -> bool {
        self.item_at(path)
            .map(|item| item.effective_bool())
            .unwrap_or(false)
    }

    /// Effective integer at a dotted path.
    pub fn int_value(&self, path: &str) -> Option<i64> {
        self.item_at(path).and_then(|item| item.effective_int())
    }

    /// Effective numeric value at a dotted path; integers coerce.
    pub fn float_value(&self, path: &str) -> Option<f64> {
        self.item_at(path).and_then(|item| item.effective_float())
    }

    /// Validate the whole tree from this group down.
    ///
    /// Every child is checked in declaration order: item violations land
    /// under the item's dotted path, nested groups recurse under their own
    /// path. An item aliased into the tree more than once is validated once,
    /// de-duplicated by cell identity, not by path. After the children, this
    /// group's own rules run; every rule is evaluated — a failing rule never
    /// short-circuits the rest. Validation is idempotent and mutates nothing.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut seen = HashSet::new();
        self.validate_into("", &mut report, &mut seen);
        report
    }

    fn validate_into(&self, path: &str, report: &mut ValidationReport, seen: &mut HashSet<usize>) {
        for (name, child) in &self.children {
            let child_path = join_path(path, name);
            match child {
                ConfigNode::Item(item) => {
                    if !seen.insert(item.cell_id()) {
                        continue;
                    }
                    if let Some(violation) = item.validate() {
                        report.add_violation(child_path, violation);
                    }
                }
                ConfigNode::Group(group) => group.validate_into(&child_path, report, seen),
            }
        }
        for rule in &self.rules {
            if let Some(message) = (rule.check)(self) {
                report.add_violation(
                    path.to_string(),
                    Violation::new(message, ViolationCause::Rule(rule.name.clone())),
                );
            }
        }
    }

    /// Walk a nested mapping and assign every key that matches a declared
    /// child: items get the scalar, nested groups recurse. Unknown keys are
    /// ignored — tolerated deliberately so partial or forward-versioned
    /// configs populate what they can. Missing keys keep declared defaults.
    pub fn populate_from(&mut self, mapping: &Map<String, Value>) {
        for (key, value) in mapping {
            match self.node_mut(key) {
                None => debug!(key = %key, "ignoring unknown configuration key"),
                Some(ConfigNode::Item(item)) => {
                    if !item.set_json(value) {
                        debug!(key = %key, "ignoring non-scalar value for configuration item");
                    }
                }
                Some(ConfigNode::Group(group)) => match value.as_object() {
                    Some(nested) => group.populate_from(nested),
                    None => debug!(key = %key, "ignoring non-mapping value for configuration group"),
                },
            }
        }
    }

    /// Populate, then validate: the caller gets either a fully-valid group or
    /// the populated report — never a partially-validated instance.
    pub fn validated_from(
        mut self,
        mapping: &Map<String, Value>,
    ) -> Result<ConfigGroup, ValidationReport> {
        self.populate_from(mapping);
        let report = self.validate();
        if report.is_valid() {
            Ok(self)
        } else {
            Err(report)
        }
    }

    /// Project every leaf to its dotted path and raw value (`null` when
    /// unset). Export only; never used for identity.
    pub fn to_flat_mapping(&self) -> Map<String, Value> {
        let mut out = Map::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, path: &str, out: &mut Map<String, Value>) {
        for (name, child) in &self.children {
            let child_path = join_path(path, name);
            match child {
                ConfigNode::Item(item) => {
                    let raw = item
                        .value()
                        .map(|v| v.to_json())
                        .unwrap_or(Value::Null);
                    out.insert(child_path, raw);
                }
                ConfigNode::Group(group) => group.flatten_into(&child_path, out),
            }
        }
    }

    /// The nested projection: the inverse shape of what
    /// [`ConfigGroup::populate_from`] consumes.
    pub fn to_mapping(&self) -> Value {
        let mut out = Map::new();
        for (name, child) in &self.children {
            let value = match child {
                ConfigNode::Item(item) => item
                    .value()
                    .map(|v| v.to_json())
                    .unwrap_or(Value::Null),
                ConfigNode::Group(group) => group.to_mapping(),
            };
            out.insert(name.clone(), value);
        }
        Value::Object(out)
    }

    /// Replace the item handle at `path` with the handle at `source_path`,
    /// collapsing the two leaves to one cell. From here on, reads, writes and
    /// validation through either path observe one underlying item. Aliasing
    /// across declared types is a schema-author error and is refused.
    pub fn alias_item(&mut self, path: &str, source_path: &str) -> Result<(), SchemaError> {
        let source = match self.node_at(source_path) {
            None => return Err(SchemaError::UnknownPath(source_path.to_string())),
            Some(ConfigNode::Group(_)) => {
                return Err(SchemaError::NotAnItem(source_path.to_string()))
            }
            Some(ConfigNode::Item(item)) => item.clone(),
        };
        let target = match self.node_at_mut(path) {
            None => return Err(SchemaError::UnknownPath(path.to_string())),
            Some(ConfigNode::Group(_)) => return Err(SchemaError::NotAnItem(path.to_string())),
            Some(ConfigNode::Item(item)) => item,
        };
        if target.item_type() != source.item_type() {
            return Err(SchemaError::AliasTypeMismatch {
                target: target.item_type(),
                src: source.item_type(),
            });
        }
        *target = source;
        Ok(())
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::properties::{BoolProperties, FloatProperties, IntProperties};
    use crate::schema::value::{ConfigValue, ItemType};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().expect("test mapping").clone()
    }

    fn chance() -> FloatProperties {
        FloatProperties::new(true, Some(0.5))
            .with_min(0.0, true)
            .with_max(1.0, true)
    }

    /// A small two-level tree: a toggle, a count, and a nested pair of
    /// chances, with one local rule tying the toggle to the count.
    fn sensor_group() -> ConfigGroup {
        ConfigGroup::new("A sensor with a stock of probes.")
            .with_item(
                "use",
                SharedItem::bool(Some(false), BoolProperties::new(false, Some(false)), "toggle")
                    .unwrap(),
            )
            .with_item(
                "probes",
                SharedItem::int(
                    Some(1),
                    IntProperties::new(true, Some(1)).with_min(0, true),
                    "stock",
                )
                .unwrap(),
            )
            .with_group(
                "chance",
                ConfigGroup::new("Detection chances.")
                    .with_item("standard", SharedItem::float(None, chance(), "std").unwrap())
                    .with_item("boosted", SharedItem::float(None, chance(), "boost").unwrap()),
            )
            .with_rule("probes_required", |g| {
                (g.bool_value("use") && g.int_value("probes").unwrap_or(0) < 1)
                    .then(|| "an enabled sensor needs at least 1 probe".to_string())
            })
    }

    #[test]
    fn populate_ignores_unknown_keys_and_sets_declared_ones() {
        let mut group = sensor_group();
        group.populate_from(&object(json!({
            "unknown_field": 1,
            "probes": 4,
            "chance": { "standard": 0.25, "also_unknown": true },
        })));
        assert_eq!(
            group.item("probes").unwrap().value(),
            Some(ConfigValue::Int(4))
        );
        assert_eq!(group.float_value("chance.standard"), Some(0.25));
        assert!(group.validate().is_valid());
    }

    #[test]
    fn item_violations_land_under_the_item_path() {
        let mut group = sensor_group();
        group.populate_from(&object(json!({ "chance": { "boosted": 7.5 } })));
        let report = group.validate();
        assert_eq!(report.total(), 1);
        assert_eq!(report.violations("chance.boosted").len(), 1);
        assert_eq!(
            report.violations("chance.boosted")[0].cause,
            ViolationCause::OutOfRange
        );
    }

    #[test]
    fn rule_violations_land_under_the_group_path() {
        let mut group = sensor_group();
        group.populate_from(&object(json!({ "use": true, "probes": 0 })));
        let report = group.validate();
        assert_eq!(report.total(), 1);
        assert_eq!(report.violations("").len(), 1);
        assert!(matches!(
            &report.violations("")[0].cause,
            ViolationCause::Rule(name) if name == "probes_required"
        ));
    }

    #[test]
    fn every_rule_runs_even_after_a_failure() {
        let group = ConfigGroup::new("two independent rules")
            .with_item(
                "a",
                SharedItem::bool(Some(true), BoolProperties::new(false, None), "a").unwrap(),
            )
            .with_rule("first", |g| {
                g.bool_value("a").then(|| "first fired".to_string())
            })
            .with_rule("second", |g| {
                g.bool_value("a").then(|| "second fired".to_string())
            });
        let report = group.validate();
        assert_eq!(report.violations("").len(), 2);
    }

    #[test]
    fn validation_is_idempotent() {
        let mut group = sensor_group();
        group.populate_from(&object(json!({ "use": true, "probes": 0 })));
        assert_eq!(group.validate(), group.validate());
    }

    #[test]
    fn aliased_items_mirror_writes_and_validate_once() {
        let mut group = ConfigGroup::new("two branches sharing one chance")
            .with_group(
                "left",
                ConfigGroup::new("left")
                    .with_item("shared", SharedItem::float(None, chance(), "x").unwrap()),
            )
            .with_group(
                "right",
                ConfigGroup::new("right")
                    .with_item("shared", SharedItem::float(None, chance(), "x").unwrap()),
            );
        group.alias_item("left.shared", "right.shared").unwrap();

        group
            .item_at("right.shared")
            .unwrap()
            .set_value(Some(ConfigValue::Float(0.8)));
        assert_eq!(group.float_value("left.shared"), Some(0.8));
        assert!(group
            .item_at("left.shared")
            .unwrap()
            .same_cell(group.item_at("right.shared").unwrap()));

        // An invalid shared value is reported once, not once per path.
        group
            .item_at("left.shared")
            .unwrap()
            .set_value(Some(ConfigValue::Float(2.0)));
        let report = group.validate();
        assert_eq!(report.total(), 1);
        assert_eq!(report.violations("left.shared").len(), 1);
    }

    #[test]
    fn alias_refuses_bad_paths_and_cross_type_collapses() {
        let mut group = sensor_group();
        assert!(matches!(
            group.alias_item("chance.standard", "chance.missing"),
            Err(SchemaError::UnknownPath(_))
        ));
        assert!(matches!(
            group.alias_item("chance", "chance.standard"),
            Err(SchemaError::NotAnItem(_))
        ));
        assert!(matches!(
            group.alias_item("use", "chance.standard"),
            Err(SchemaError::AliasTypeMismatch {
                target: ItemType::Bool,
                src: ItemType::Float,
            })
        ));
    }

    #[test]
    fn flat_mapping_uses_dotted_paths_and_raw_values() {
        let mut group = sensor_group();
        group.populate_from(&object(json!({ "probes": 2 })));
        let flat = group.to_flat_mapping();
        assert_eq!(flat.get("probes"), Some(&json!(2)));
        assert_eq!(flat.get("chance.standard"), Some(&json!(null)));
        assert_eq!(flat.len(), 4);
    }

    #[test]
    fn nested_mapping_round_trips_through_populate() {
        let mut group = sensor_group();
        group.populate_from(&object(json!({
            "use": true,
            "probes": 3,
            "chance": { "standard": 0.1, "boosted": 0.9 },
        })));

        let nested = group.to_mapping();
        let mut rebuilt = sensor_group();
        rebuilt.populate_from(nested.as_object().unwrap());
        assert_eq!(rebuilt.to_flat_mapping(), group.to_flat_mapping());
    }

    #[test]
    fn validated_from_returns_the_report_on_invalid_input() {
        let report = sensor_group()
            .validated_from(&object(json!({ "use": true, "probes": 0 })))
            .unwrap_err();
        assert!(!report.is_valid());

        let group = sensor_group()
            .validated_from(&object(json!({ "use": true, "probes": 2 })))
            .expect("a valid mapping builds a group");
        assert!(group.bool_value("use"));
    }
}
