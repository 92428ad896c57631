//! The defender agent's configuration schema.
//!
//! Tier 1 groups first (the leaf compositions), then the action set and
//! discovery groups that nest them, then the top-level [`defender`] group
//! that ties the branches together with its cross-branch rules.

use crate::agents::common::{chance_properties, use_chances};
use crate::error::SchemaError;
use crate::schema::{BoolProperties, ConfigGroup, FloatProperties, IntProperties, SharedItem};

/// How the defender fixes a node without restoring it to its initial state.
pub fn make_node_safe() -> Result<ConfigGroup, SchemaError> {
    Ok(ConfigGroup::new(
        "How the defender fixes a node without restoring it to its initial state.",
    )
    .with_item(
        "use",
        SharedItem::bool(
            Some(false),
            BoolProperties::new(false, Some(false)),
            "The defender fixes a node but does not restore it to its initial state.",
        )?,
    )
    .with_item(
        "increases_vulnerability",
        SharedItem::bool(
            Some(false),
            BoolProperties::new(false, None),
            "Fixing a node increases that node's vulnerability score.",
        )?,
    )
    .with_item(
        "gives_random_vulnerability",
        SharedItem::bool(
            Some(false),
            BoolProperties::new(false, None),
            "Fixing a node randomises that node's vulnerability score.",
        )?,
    )
    .with_item(
        "vulnerability_change_during_node_patch",
        SharedItem::float(
            None,
            FloatProperties::new(true, Some(0.0))
                .with_min(-1.0, true)
                .with_max(1.0, true),
            "Amount the vulnerability of a node changes when it is made safe.",
        )?,
    )
    .with_rule("fixed_and_random_vulnerability", |g| {
        (g.bool_value("increases_vulnerability") && g.bool_value("gives_random_vulnerability"))
            .then(|| {
                "making a node safe cannot both increase its vulnerability by a set amount \
                 and randomise it"
                    .to_string()
            })
    }))
}

/// The defender's use of deceptive nodes.
pub fn deceptive_nodes() -> Result<ConfigGroup, SchemaError> {
    Ok(ConfigGroup::new(
        "The defender's placement of deceptive nodes. Deceptive nodes behave like any \
         other node but carry their own chance of spotting attacks and always reveal \
         when they are compromised.",
    )
    .with_item(
        "use",
        SharedItem::bool(
            Some(false),
            BoolProperties::new(false, Some(false)),
            "The defender can place deceptive nodes.",
        )?,
    )
    .with_item(
        "max_number",
        SharedItem::int(
            Some(1),
            IntProperties::new(true, Some(1)).with_min(0, true),
            "Maximum number of deceptive nodes the defender can place.",
        )?,
    )
    .with_item(
        "new_node_on_relocate",
        SharedItem::bool(
            Some(false),
            BoolProperties::new(true, Some(false)),
            "When a deceptive node is relocated, whether its stats are re-generated as \
             if it were newly added rather than carried over.",
        )?,
    )
    .with_rule("deceptive_nodes_require_stock", |g| {
        (g.bool_value("use") && g.int_value("max_number").unwrap_or(0) < 1).then(|| {
            "if the defender can use deceptive nodes it must be able to create at least 1"
                .to_string()
        })
    }))
}

/// The set of actions the defender can perform.
pub fn action_set() -> Result<ConfigGroup, SchemaError> {
    let mut group = ConfigGroup::new("The set of actions the defender can perform.");
    for (name, doc) in [
        (
            "reduce_vulnerability",
            "The defender picks a node and reduces its vulnerability score.",
        ),
        (
            "restore_node",
            "The defender picks a node and restores everything about it to its starting state.",
        ),
        (
            "scan",
            "The defender scans every node to try to detect intrusions.",
        ),
        (
            "isolate_node",
            "The defender disables all connections to and from a node.",
        ),
        (
            "reconnect_node",
            "The defender re-enables all connections to and from a node.",
        ),
        ("do_nothing", "The defender can skip its turn."),
    ] {
        group = group.with_item(
            name,
            SharedItem::bool(Some(false), BoolProperties::new(true, Some(false)), doc)?,
        );
    }
    Ok(group
        .with_group("make_node_safe", make_node_safe()?)
        .with_group("deceptive_nodes", deceptive_nodes()?)
        .with_rule("isolate_reconnect_pair", |g| {
            let isolate = g.bool_value("isolate_node");
            let reconnect = g.bool_value("reconnect_node");
            (isolate != reconnect).then(|| {
                "isolating and reconnecting nodes must be enabled together".to_string()
            })
        }))
}

/// Chances for the defender to discover intrusions on different node kinds.
pub fn intrusion_discovery() -> Result<ConfigGroup, SchemaError> {
    Ok(ConfigGroup::new(
        "Chances for the defender to discover intrusions on different node kinds.",
    )
    .with_item(
        "immediate",
        SharedItem::float(
            None,
            chance_properties(),
            "Chance to discover a compromised node the instant it is compromised.",
        )?,
    )
    .with_item(
        "immediate_deceptive_node",
        SharedItem::float(
            None,
            chance_properties(),
            "Chance to discover a compromised deceptive node the instant it is compromised.",
        )?,
    )
    .with_item(
        "on_scan",
        SharedItem::float(
            None,
            chance_properties(),
            "Chance that the scan action discovers an intrusion.",
        )?,
    )
    .with_item(
        "on_scan_deceptive_node",
        SharedItem::float(
            None,
            chance_properties(),
            "Chance that the scan action discovers an intrusion on a deceptive node.",
        )?,
    )
    .with_rule("deceptive_scan_advantage", |g| {
        let standard = g.float_value("on_scan").unwrap_or(0.0);
        let deceptive = g.float_value("on_scan_deceptive_node").unwrap_or(0.0);
        (deceptive <= standard && deceptive != 1.0).then(|| {
            "intrusions on deceptive nodes should be easier to detect than on standard nodes"
                .to_string()
        })
    }))
}

/// Which of the attacker's moves the defender can discover, with their
/// chances. Both succeeded-attack branches share one deceptive-node chance:
/// the deceptive node always reveals the compromise, so whether its nature is
/// known cannot change the discovery odds.
pub fn attack_discovery() -> Result<ConfigGroup, SchemaError> {
    let mut group = ConfigGroup::new(
        "Which of the attacker's moves the defender can discover, with the associated \
         discovery chances per node kind.",
    )
    .with_group("failed_attacks", use_chances("Discovery of attacks that failed.")?)
    .with_group(
        "succeeded_attacks",
        use_chances(
            "Discovery of successful attacks where the nature of the compromise is known.",
        )?,
    )
    .with_group(
        "succeeded_attacks_unknown_compromise",
        use_chances(
            "Discovery of successful attacks where the nature of the compromise is unknown.",
        )?,
    );
    group.alias_item(
        "succeeded_attacks.chance.deceptive_node",
        "succeeded_attacks_unknown_compromise.chance.deceptive_node",
    )?;
    Ok(group)
}

/// All options governing the defender agent's behaviour.
pub fn defender() -> Result<ConfigGroup, SchemaError> {
    Ok(ConfigGroup::new("All options governing the defender agent's behaviour.")
        .with_group("action_set", action_set()?)
        .with_group("intrusion_discovery_chance", intrusion_discovery()?)
        .with_group("attack_discovery", attack_discovery()?)
        .with_rule("redundant_scan", |g| {
            let scan = g.bool_value("action_set.scan");
            let immediate = g
                .float_value("intrusion_discovery_chance.immediate")
                .unwrap_or(0.0);
            (scan && immediate == 1.0).then(|| {
                "the scan action is redundant when intrusions are always discovered immediately"
                    .to_string()
            })
        })
        .with_rule("undetectable_intrusions", |g| {
            let scan = g.bool_value("action_set.scan");
            let immediate = g
                .float_value("intrusion_discovery_chance.immediate")
                .unwrap_or(0.0);
            (!scan && immediate != 1.0).then(|| {
                "without the scan action intrusions must be discovered immediately".to_string()
            })
        }))
}
