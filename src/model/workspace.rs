// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! The top-level container a session runs against, plus its versioned
//! serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Serializer;

use super::allocation::AllocationDefinition;
use super::dataset::{Dataset, Grammar};
use super::named::{Conditions, NamedCondition};
use super::registry::ConditionsRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationVersion {
    #[serde(rename = "MAJOR")]
    pub major: u32,
    #[serde(rename = "MINOR")]
    pub minor: u32,
}

pub const SERIALIZATION_VERSION: SerializationVersion =
    SerializationVersion { major: 0, minor: 1 };

/// Packages the data a user works on: datasets, the permanent condition
/// registry, the named-conditions map derived from it, and allocation trees.
/// Mutation of named conditions goes through `ops::WorkspaceSession`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    title: String,
    position_sets: Vec<Dataset>,
    grammar: Grammar,
    registry: ConditionsRegistry,
    conditions: Conditions,
    allocations: Vec<AllocationDefinition>,
}

impl Workspace {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    pub fn with_parts(
        title: impl Into<String>,
        position_sets: Vec<Dataset>,
        grammar: Grammar,
        registry: ConditionsRegistry,
        conditions: Conditions,
        allocations: Vec<AllocationDefinition>,
    ) -> Self {
        Self {
            title: title.into(),
            position_sets,
            grammar,
            registry,
            conditions,
            allocations,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn position_sets(&self) -> &[Dataset] {
        &self.position_sets
    }

    pub fn position_sets_mut(&mut self) -> &mut Vec<Dataset> {
        &mut self.position_sets
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn registry(&self) -> &ConditionsRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ConditionsRegistry {
        &mut self.registry
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut Conditions {
        &mut self.conditions
    }

    pub fn allocations(&self) -> &[AllocationDefinition] {
        &self.allocations
    }

    pub fn allocations_mut(&mut self) -> &mut Vec<AllocationDefinition> {
        &mut self.allocations
    }
}

#[derive(Serialize, Deserialize)]
struct WorkspaceDoc {
    title: String,
    #[serde(rename = "positionSets")]
    position_sets: Vec<Dataset>,
    grammar: Grammar,
    registry: ConditionsRegistry,
    conditions: BTreeMap<String, NamedCondition>,
    allocations: Vec<AllocationDefinition>,
    version: SerializationVersion,
}

/// Serializes workspaces into the versioned JSON document the storage layer
/// persists. Deserialization rejects documents missing required keys or
/// written by a later major version.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceSerializer;

impl Serializer for WorkspaceSerializer {
    type Entity = Workspace;

    fn to_str(&self, workspace: &Workspace) -> String {
        let doc = WorkspaceDoc {
            title: workspace.title.clone(),
            position_sets: workspace.position_sets.clone(),
            grammar: workspace.grammar.clone(),
            registry: workspace.registry.clone(),
            conditions: workspace.conditions.clone(),
            allocations: workspace.allocations.clone(),
            version: SERIALIZATION_VERSION,
        };
        serde_json::to_string(&doc).expect("workspace serializes to JSON")
    }

    fn from_str(&self, text: &str) -> Option<Workspace> {
        let doc: WorkspaceDoc = serde_json::from_str(text).ok()?;
        if doc.version.major > SERIALIZATION_VERSION.major {
            return None;
        }
        Some(Workspace {
            title: doc.title,
            position_sets: doc.position_sets,
            grammar: doc.grammar,
            registry: doc.registry,
            conditions: doc.conditions,
            allocations: doc.allocations,
        })
    }

    fn identifier(&self, workspace: &Workspace) -> String {
        workspace.title.clone()
    }

    fn prefix(&self) -> &'static str {
        "workspace_"
    }
}
