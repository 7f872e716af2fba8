// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Mutation operations on condition registries.
//!
//! `ConditionsBuilder` allocates ids and registers definitions;
//! `WorkspaceSession` governs safe mutation of named conditions across the
//! permanent/transient registry pair. Expected validation failures surface as
//! `SessionError` values with stable machine-checkable codes; callers branch
//! on the code, never on the message text.

use std::fmt;

mod builder;
mod session;

pub use builder::ConditionsBuilder;
pub use session::WorkspaceSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    BadId,
    EditInProgress,
    IdNotFound { id: String },
    UnnamedId { id: String },
    Referenced { name: String },
    NotEditing,
    MissingOriginal { name: String },
    NameInUse { name: String },
    BrokenRef { name: String },
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadId => "BAD_ID",
            Self::EditInProgress => "EDIT_IN_PROGRESS",
            Self::IdNotFound { .. } => "ID_NOT_FOUND",
            Self::UnnamedId { .. } => "UNNAMED_ID",
            Self::Referenced { .. } => "REFERENCED",
            Self::NotEditing => "NOT_EDITING",
            Self::MissingOriginal { .. } => "MISSING_ORIGINAL",
            Self::NameInUse { .. } => "NAME_IN_USE",
            Self::BrokenRef { .. } => "BROKEN_REF",
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadId => f.write_str("condition id must be a non-empty string"),
            Self::EditInProgress => f.write_str("another edit is already in progress"),
            Self::IdNotFound { id } => write!(f, "condition '{id}' is not registered"),
            Self::UnnamedId { id } => write!(f, "condition '{id}' is not a named condition"),
            Self::Referenced { name } => {
                write!(f, "condition '{name}' is still referenced by other conditions")
            }
            Self::NotEditing => f.write_str("no edit is in progress"),
            Self::MissingOriginal { name } => {
                write!(f, "cannot update '{name}': no such named condition")
            }
            Self::NameInUse { name } => {
                write!(f, "the name '{name}' already belongs to another condition")
            }
            Self::BrokenRef { name } => {
                write!(f, "reference to unknown named condition '{name}'")
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests;
