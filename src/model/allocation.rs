// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Allocation trees: the definition a user arranges and the classification
//! output the executor produces.
//!
//! The two are topologically alike, except that a multi-valued condition in
//! the definition expands into one output folder per matched value.

use serde::{Deserialize, Serialize};

use super::dataset::Row;

/// Literal id marking the root of an allocation definition.
pub const ROOT_MARKER: &str = "root";

/// A folder-like arrangement of condition ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationDefinition {
    pub id: String,
    pub children: Vec<AllocationDefinition>,
}

impl AllocationDefinition {
    pub fn root(children: Vec<AllocationDefinition>) -> Self {
        Self { id: ROOT_MARKER.to_owned(), children }
    }

    pub fn node(id: impl Into<String>, children: Vec<AllocationDefinition>) -> Self {
        Self { id: id.into(), children }
    }

    pub fn leaf(id: impl Into<String>) -> Self {
        Self::node(id, Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_MARKER
    }
}

/// One node of the classification result.
///
/// `classified` holds the rows assigned to this folder and not to a deeper
/// one. `unclassified` is working state during interpretation; it is always
/// drained before a result reaches a caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationOutput {
    #[serde(rename = "folderName")]
    pub folder_name: String,
    pub classified: Vec<Row>,
    pub unclassified: Vec<Row>,
    pub children: Vec<AllocationOutput>,
}

impl AllocationOutput {
    /// Folder name of a flattening junction with no semantic folder of its own.
    pub const WRAPPER: &'static str = "Wrapper";
    /// Folder name of the fail-fast output for invalid definitions.
    pub const ERROR: &'static str = "Error";

    pub fn folder(
        folder_name: impl Into<String>,
        classified: Vec<Row>,
        unclassified: Vec<Row>,
        children: Vec<AllocationOutput>,
    ) -> Self {
        Self { folder_name: folder_name.into(), classified, unclassified, children }
    }

    pub fn error() -> Self {
        Self::folder(Self::ERROR, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn is_wrapper(&self) -> bool {
        self.folder_name == Self::WRAPPER
    }
}
