//! The generic configuration schema model.
//!
//! Leaves first: [`value`] defines the scalar value space and declared item
//! kinds, [`properties`] the per-type constraint sets, [`item`] the leaf and
//! its shared-cell handle, [`validation`] the per-path result aggregator, and
//! [`group`] the composite that ties them together.

pub mod group;
pub mod item;
pub mod properties;
pub mod validation;
pub mod value;

pub use group::{ConfigGroup, ConfigNode, GroupRule};
pub use item::{ConfigItem, SharedItem};
pub use properties::{BoolProperties, FloatProperties, IntProperties, ItemProperties, StrProperties};
pub use validation::{ValidationReport, Violation, ViolationCause};
pub use value::{ConfigValue, ItemType};
