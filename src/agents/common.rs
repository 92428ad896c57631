//! Schema building blocks shared by more than one agent group.

use crate::error::SchemaError;
use crate::schema::{BoolProperties, ConfigGroup, FloatProperties, SharedItem};

/// Bounds shared by every chance item: [0, 1] inclusive, null allowed,
/// defaulting to an even chance.
pub(crate) fn chance_properties() -> FloatProperties {
    FloatProperties::new(true, Some(0.5))
        .with_min(0.0, true)
        .with_max(1.0, true)
}

/// A capability toggle paired with per-node-kind discovery chances.
///
/// The same shape backs each of the attack-discovery branches; callers pass
/// the pre-built group into their own composition.
pub fn use_chances(doc: impl Into<String>) -> Result<ConfigGroup, SchemaError> {
    Ok(ConfigGroup::new(doc)
        .with_item(
            "use",
            SharedItem::bool(
                Some(false),
                BoolProperties::new(false, Some(false)),
                "Whether the capability is enabled.",
            )?,
        )
        .with_group(
            "chance",
            ConfigGroup::new("Discovery chances per node kind.")
                .with_item(
                    "standard_node",
                    SharedItem::float(
                        None,
                        chance_properties(),
                        "Chance applied to a standard node.",
                    )?,
                )
                .with_item(
                    "deceptive_node",
                    SharedItem::float(
                        None,
                        chance_properties(),
                        "Chance applied to a deceptive node.",
                    )?,
                ),
        ))
}
