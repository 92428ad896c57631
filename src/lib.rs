//! netdef-config
//!
//! Hierarchical configuration schema engine for the netdef simulation.
//!
//! The engine models configuration as a tree: typed, constrained leaf values
//! ([`SharedItem`]) composed into nested named groups ([`ConfigGroup`]) with
//! locally declared cross-field rules. Validation never raises on user data;
//! every failed constraint or rule lands in a [`ValidationReport`] addressable
//! by group path, and a configuration is valid exactly when that report is
//! empty. Schema-author mistakes (a default outside its own bounds, aliasing
//! a path that does not exist) are a separate channel and fail fast with
//! [`SchemaError`].
//!
//! ## Quick start
//!
//! ```rust
//! use netdef_config::agents::defender;
//! use netdef_config::source::mapping_from_yaml;
//!
//! let mapping = mapping_from_yaml(
//!     "action_set:\n  scan: true\n  isolate_node: true\n  reconnect_node: true\n",
//! )
//! .unwrap();
//!
//! let mut config = defender::defender().unwrap();
//! config.populate_from(&mapping);
//!
//! let report = config.validate();
//! if !report.is_valid() {
//!     eprintln!("{}", report.render());
//! }
//! ```

// Core error handling
pub mod error;

// Generic schema model: values, constraints, items, groups, reports
pub mod schema;

// In-memory ingestion of JSON/YAML documents into populate mappings
pub mod source;

// Concrete schema groups for the simulation's agents
pub mod agents;

// Public re-exports for the engine surface
pub use error::SchemaError;
pub use schema::group::{ConfigGroup, ConfigNode, GroupRule};
pub use schema::item::{ConfigItem, SharedItem};
pub use schema::properties::{
    BoolProperties, FloatProperties, IntProperties, ItemProperties, StrProperties,
};
pub use schema::validation::{ValidationReport, Violation, ViolationCause};
pub use schema::value::{ConfigValue, ItemType};
