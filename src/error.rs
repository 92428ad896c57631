//! Structural error channel for the schema engine.
//!
//! These are schema-author mistakes and fail fast at construction or wiring
//! time. User-supplied values that break constraints are *not* errors; they
//! are recorded in a [`crate::ValidationReport`] and returned to the caller.

use thiserror::Error;

use crate::schema::value::ItemType;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("default {default} is outside the declared bounds")]
    DefaultOutOfBounds { default: String },

    #[error("minimum bound {min} exceeds maximum bound {max}")]
    InvertedBounds { min: String, max: String },

    #[error("default '{default}' is not one of the declared options")]
    DefaultNotAnOption { default: String },

    #[error("value is null and the item does not allow null")]
    NullConstraint,

    #[error("no child declared at path '{0}'")]
    UnknownPath(String),

    #[error("child at path '{0}' is not an item")]
    NotAnItem(String),

    #[error("cannot alias a {target} item onto a {src} item")]
    AliasTypeMismatch { target: ItemType, src: ItemType },

    #[error("failed to parse {format} source: {message}")]
    Source {
        format: &'static str,
        message: String,
    },
}
