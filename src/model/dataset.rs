// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Tabular input: a named set of rows plus the grammar describing its fields.
//!
//! The grammar exists for validation and presentation; the allocation engine
//! itself only reads named properties off rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single data row: a plain property map.
pub type Row = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarType {
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Grammar {
    pub fields: Vec<String>,
    pub types: Vec<GrammarType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub grammar: Grammar,
    pub positions: Vec<Row>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, grammar: Grammar, positions: Vec<Row>) -> Self {
        Self { name: name.into(), grammar, positions }
    }
}
