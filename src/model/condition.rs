// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Condition definitions: the tagged union every other layer consumes.
//!
//! A definition is pure data. Predicates over single properties
//! (`between`/`identity`/`comparison`), multi-branch expansions
//! (`values`/`enums`/`ranges`), and composites (`not`/`bool`/`and`/`or`) all
//! carry an `id` unique within their registry and a `name`. An empty name
//! marks an anonymous, structural node; a non-empty name marks a condition
//! directly addressable by a user. `reference` is an editing-only stub that
//! points at another named condition by name and never appears in a permanent
//! registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
}

impl ComparisonOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }
}

/// Payload of a `between` condition: `range` holds the low/high bounds,
/// `included` whether each bound itself classifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetweenValue {
    pub range: [Value; 2],
    pub included: [bool; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonValue {
    pub operator: ComparisonOperator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConditionDef {
    Between {
        id: String,
        name: String,
        property: String,
        value: BetweenValue,
    },
    Identity {
        id: String,
        name: String,
        property: String,
        value: Value,
    },
    Comparison {
        id: String,
        name: String,
        property: String,
        value: ComparisonValue,
    },
    Values {
        id: String,
        name: String,
        property: String,
        values: Vec<Value>,
    },
    /// Each entry of `values` is itself a list; a row matches an entry when
    /// its property is a member of that list.
    Enums {
        id: String,
        name: String,
        property: String,
        values: Vec<Value>,
    },
    /// Ascending breakpoints; an implicit final bucket catches everything
    /// above the last one.
    Ranges {
        id: String,
        name: String,
        property: String,
        values: Vec<Value>,
    },
    Not {
        id: String,
        name: String,
        /// Id of the negated condition.
        value: String,
    },
    Bool {
        id: String,
        name: String,
        value: bool,
    },
    /// Editing-only stub naming another named condition.
    Reference {
        id: String,
        name: String,
        /// Name of the referenced condition.
        value: String,
    },
    And {
        id: String,
        name: String,
        values: Vec<String>,
    },
    Or {
        id: String,
        name: String,
        values: Vec<String>,
    },
}

impl ConditionDef {
    pub fn id(&self) -> &str {
        match self {
            Self::Between { id, .. }
            | Self::Identity { id, .. }
            | Self::Comparison { id, .. }
            | Self::Values { id, .. }
            | Self::Enums { id, .. }
            | Self::Ranges { id, .. }
            | Self::Not { id, .. }
            | Self::Bool { id, .. }
            | Self::Reference { id, .. }
            | Self::And { id, .. }
            | Self::Or { id, .. } => id,
        }
    }

    pub fn set_id(&mut self, new_id: impl Into<String>) {
        match self {
            Self::Between { id, .. }
            | Self::Identity { id, .. }
            | Self::Comparison { id, .. }
            | Self::Values { id, .. }
            | Self::Enums { id, .. }
            | Self::Ranges { id, .. }
            | Self::Not { id, .. }
            | Self::Bool { id, .. }
            | Self::Reference { id, .. }
            | Self::And { id, .. }
            | Self::Or { id, .. } => *id = new_id.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Between { name, .. }
            | Self::Identity { name, .. }
            | Self::Comparison { name, .. }
            | Self::Values { name, .. }
            | Self::Enums { name, .. }
            | Self::Ranges { name, .. }
            | Self::Not { name, .. }
            | Self::Bool { name, .. }
            | Self::Reference { name, .. }
            | Self::And { name, .. }
            | Self::Or { name, .. } => name,
        }
    }

    pub fn is_named(&self) -> bool {
        !self.name().is_empty()
    }

    /// The serialized discriminator, e.g. `"between"` or `"and"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Between { .. } => "between",
            Self::Identity { .. } => "identity",
            Self::Comparison { .. } => "comparison",
            Self::Values { .. } => "values",
            Self::Enums { .. } => "enums",
            Self::Ranges { .. } => "ranges",
            Self::Not { .. } => "not",
            Self::Bool { .. } => "bool",
            Self::Reference { .. } => "reference",
            Self::And { .. } => "and",
            Self::Or { .. } => "or",
        }
    }

    /// Ids this definition points at directly: the negated condition for
    /// `not`, the operand list for `and`/`or`, nothing otherwise.
    pub fn direct_child_ids(&self) -> Vec<&str> {
        match self {
            Self::Not { value, .. } => vec![value.as_str()],
            Self::And { values, .. } | Self::Or { values, .. } => {
                values.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Rewrites internal pointers through `map`, leaving ids without a
    /// mapping untouched. Used when migrating a subtree between registries.
    pub fn remap_child_ids(&mut self, map: &BTreeMap<String, String>) {
        match self {
            Self::Not { value, .. } => {
                if let Some(mapped) = map.get(value) {
                    *value = mapped.clone();
                }
            }
            Self::And { values, .. } | Self::Or { values, .. } => {
                for value in values {
                    if let Some(mapped) = map.get(value) {
                        *value = mapped.clone();
                    }
                }
            }
            _ => {}
        }
    }
}
