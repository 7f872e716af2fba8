// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Core data model.
//!
//! Workspaces hold datasets, a condition registry, and the named-conditions
//! map derived from it; allocation trees tie conditions to classification
//! output.

pub mod allocation;
pub mod condition;
pub mod dataset;
pub mod ids;
pub mod named;
pub mod registry;
pub mod scalar;
pub mod workspace;

pub use allocation::{AllocationDefinition, AllocationOutput, ROOT_MARKER};
pub use condition::{BetweenValue, ComparisonOperator, ComparisonValue, ConditionDef};
pub use dataset::{Dataset, Grammar, GrammarType, Row};
pub use ids::IdGenerator;
pub use named::{Conditions, NamedCondition, ReferenceError};
pub use registry::ConditionsRegistry;
pub use workspace::{
    SerializationVersion, Workspace, WorkspaceSerializer, SERIALIZATION_VERSION,
};
