//! Per-path aggregation of validation failures.
//!
//! Validity is the absence of entries; there is no separate success flag.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// The originating condition of a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCause {
    /// A non-nullable item holds no value.
    NullValue,
    /// The value's kind does not match the item's declared type.
    TypeKind,
    /// A numeric value sits outside the declared bounds.
    OutOfRange,
    /// A categorical value is not one of the declared options.
    InvalidOption,
    /// A cross-field rule failed, named here.
    Rule(String),
}

impl ViolationCause {
    pub fn label(&self) -> &str {
        match self {
            ViolationCause::NullValue => "null",
            ViolationCause::TypeKind => "type",
            ViolationCause::OutOfRange => "range",
            ViolationCause::InvalidOption => "option",
            ViolationCause::Rule(name) => name,
        }
    }
}

/// A single recorded failure: a message plus the condition that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub message: String,
    pub cause: ViolationCause,
}

impl Violation {
    pub fn new(message: impl Into<String>, cause: ViolationCause) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.cause.label(), self.message)
    }
}

/// Aggregated validation results for a group tree, addressable by group path.
///
/// Item violations are keyed by the item's dotted path, rule violations by
/// the owning group's path; the root group's own rules land under the empty
/// path. Per-path order is arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    entries: BTreeMap<String, Vec<Violation>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_violation(&mut self, path: impl Into<String>, violation: Violation) {
        self.entries.entry(path.into()).or_default().push(violation);
    }

    /// Namespace a child report's paths under `child_name` and absorb its
    /// entries.
    pub fn merge(&mut self, child: ValidationReport, child_name: &str) {
        for (path, violations) in child.entries {
            let namespaced = if path.is_empty() {
                child_name.to_string()
            } else {
                format!("{child_name}.{path}")
            };
            self.entries
                .entry(namespaced)
                .or_default()
                .extend(violations);
        }
    }

    /// A configuration is valid exactly when nothing anywhere was recorded.
    pub fn is_valid(&self) -> bool {
        self.entries.is_empty()
    }

    /// The violations recorded under one path; empty when the path is clean.
    pub fn violations(&self, path: &str) -> &[Violation] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total violation count across every path.
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Violation)> {
        self.entries
            .iter()
            .flat_map(|(path, violations)| violations.iter().map(move |v| (path.as_str(), v)))
    }

    /// Human-readable multi-line report grouped by path. Diagnostic output
    /// only; program logic should inspect [`ValidationReport::is_valid`].
    pub fn render(&self) -> String {
        if self.is_valid() {
            return "configuration valid".to_string();
        }
        let mut out = String::new();
        for (path, violations) in &self.entries {
            out.push_str(Self::display_path(path));
            out.push_str(":\n");
            for violation in violations {
                out.push_str(&format!("  - {violation}\n"));
            }
        }
        out
    }

    /// Emit every recorded violation through `tracing` at WARN.
    pub fn log(&self) {
        for (path, violations) in &self.entries {
            let path = Self::display_path(path);
            for violation in violations {
                tracing::warn!(path, %violation, "configuration validation failure");
            }
        }
    }

    fn display_path(path: &str) -> &str {
        if path.is_empty() {
            "(root)"
        } else {
            path
        }
    }
}
