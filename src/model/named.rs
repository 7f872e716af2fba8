// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Named conditions and their deletion-gating reference ledger.
//!
//! A `NamedCondition` pairs a condition's user-facing name with the id of its
//! root definition plus the set of definition ids that point at it. The set
//! is a non-owning back-reference ledger, kept in sync by the session layer:
//! a named condition can only be removed while nothing references it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name-to-entry map, one entry per named condition in a registry.
pub type Conditions = BTreeMap<String, NamedCondition>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "NamedConditionRepr", into = "NamedConditionRepr")]
pub struct NamedCondition {
    name: String,
    condition_id: String,
    references: Vec<String>,
}

impl NamedCondition {
    pub fn new(name: impl Into<String>, condition_id: impl Into<String>) -> Self {
        Self { name: name.into(), condition_id: condition_id.into(), references: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition_id(&self) -> &str {
        &self.condition_id
    }

    /// Referencing ids in insertion order.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub fn has_reference(&self, condition_id: &str) -> bool {
        self.references.iter().any(|id| id == condition_id)
    }

    /// Records that `condition_id` now points at this condition. A duplicate
    /// add signals a bookkeeping bug in the caller.
    pub fn add_reference(
        &mut self,
        condition_id: impl Into<String>,
    ) -> Result<(), ReferenceError> {
        let condition_id = condition_id.into();
        if self.has_reference(&condition_id) {
            return Err(ReferenceError::AlreadyReferenced {
                condition_id: self.condition_id.clone(),
                name: self.name.clone(),
                by: condition_id,
            });
        }
        self.references.push(condition_id);
        Ok(())
    }

    pub fn remove_reference(&mut self, condition_id: &str) -> Result<(), ReferenceError> {
        let Some(index) = self.references.iter().position(|id| id == condition_id) else {
            return Err(ReferenceError::NotReferenced {
                condition_id: self.condition_id.clone(),
                name: self.name.clone(),
                by: condition_id.to_owned(),
            });
        };
        self.references.remove(index);
        Ok(())
    }

    pub fn can_remove(&self) -> bool {
        self.references.is_empty()
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).expect("named condition serializes to JSON")
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// Reference order is an insertion artifact; equivalence is set-wise.
impl PartialEq for NamedCondition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.condition_id == other.condition_id
            && self.references.len() == other.references.len()
            && self.references.iter().collect::<BTreeSet<_>>()
                == other.references.iter().collect::<BTreeSet<_>>()
    }
}

impl Eq for NamedCondition {}

#[derive(Serialize, Deserialize)]
struct NamedConditionRepr {
    name: String,
    #[serde(rename = "conditionId")]
    condition_id: String,
    references: Vec<String>,
}

impl From<NamedConditionRepr> for NamedCondition {
    fn from(repr: NamedConditionRepr) -> Self {
        Self { name: repr.name, condition_id: repr.condition_id, references: repr.references }
    }
}

impl From<NamedCondition> for NamedConditionRepr {
    fn from(named: NamedCondition) -> Self {
        Self { name: named.name, condition_id: named.condition_id, references: named.references }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    AlreadyReferenced { condition_id: String, name: String, by: String },
    NotReferenced { condition_id: String, name: String, by: String },
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyReferenced { condition_id, name, by } => write!(
                f,
                "condition {condition_id} ({name}) is already referenced by {by}"
            ),
            Self::NotReferenced { condition_id, name, by } => write!(
                f,
                "condition {condition_id} ({name}) has no reference from {by}"
            ),
        }
    }
}

impl std::error::Error for ReferenceError {}
