// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! The allocation interpreter.
//!
//! Applies an allocation definition tree to a dataset, partitioning rows
//! folder by folder into an `AllocationOutput` tree. Sibling conditions see
//! rows left over by their predecessors (first match wins); multi-valued
//! conditions expand into one folder per matched bucket under a transparent
//! "Wrapper" junction.
//!
//! Input validation is deliberately thin: the only guarded failure is a
//! definition whose root is not the `root` marker, which yields the dedicated
//! "Error" output. Dangling condition ids panic and cyclic graphs recurse
//! unboundedly; feeding the executor anything but a registry maintained
//! through the session layer is unspecified behavior.

mod matcher;

use serde_json::Value;

use crate::model::scalar;
use crate::model::{
    AllocationDefinition, AllocationOutput, BetweenValue, ConditionDef, ConditionsRegistry,
    Dataset, Row,
};

use matcher::{between_matches, comparison_matches, identity_matches, Matcher};

pub struct AllocationExecutor<'a> {
    registry: &'a ConditionsRegistry,
}

impl<'a> AllocationExecutor<'a> {
    pub fn new(registry: &'a ConditionsRegistry) -> Self {
        Self { registry }
    }

    /// Applies `definition` to `dataset`. Rows never claimed by any folder
    /// end up classified directly under the returned root, which is always a
    /// "Wrapper" (or the "Error" output for a definition whose root id is not
    /// the root marker).
    pub fn interpret(
        &self,
        definition: &AllocationDefinition,
        dataset: &Dataset,
    ) -> AllocationOutput {
        if !definition.is_root() {
            return AllocationOutput::error();
        }
        match self.interpret_siblings(&definition.children, dataset.positions.clone()) {
            None => AllocationOutput::folder(
                AllocationOutput::WRAPPER,
                dataset.positions.clone(),
                Vec::new(),
                Vec::new(),
            ),
            Some(mut result) => {
                // Sibling interpretation always yields a wrapper; the rows it
                // could not place live at the root.
                result.classified = std::mem::take(&mut result.unclassified);
                result
            }
        }
    }

    /// Interprets a sibling list left to right: rows one sibling leaves
    /// unclassified feed the next. Wrapper results are spliced into the
    /// parent's child list instead of nesting. Returns `None` when no folders
    /// came out at all, signalling "nothing to show".
    fn interpret_siblings(
        &self,
        nodes: &[AllocationDefinition],
        rows: Vec<Row>,
    ) -> Option<AllocationOutput> {
        let mut children = Vec::new();
        let mut leftover = Vec::new();
        let mut to_classify = rows;

        for (index, node) in nodes.iter().enumerate() {
            let mut output = self.interpret_node(node, to_classify);
            to_classify = std::mem::take(&mut output.unclassified);

            if output.is_wrapper() {
                children.extend(output.children);
            } else {
                children.push(output);
            }

            if to_classify.is_empty() {
                break;
            }
            if index == nodes.len() - 1 {
                leftover = std::mem::take(&mut to_classify);
            }
        }

        if children.is_empty() {
            return None;
        }
        Some(AllocationOutput::folder(
            AllocationOutput::WRAPPER,
            Vec::new(),
            leftover,
            children,
        ))
    }

    fn interpret_node(&self, node: &AllocationDefinition, rows: Vec<Row>) -> AllocationOutput {
        // A root marker nested below the top level carries no condition of its
        // own; its children are interpreted in place.
        if node.is_root() {
            let pool = rows.clone();
            return match self.interpret_siblings(&node.children, rows) {
                Some(output) => output,
                None => AllocationOutput::folder(
                    AllocationOutput::WRAPPER,
                    Vec::new(),
                    pool,
                    Vec::new(),
                ),
            };
        }

        let def = self
            .registry
            .fetch(&node.id)
            .unwrap_or_else(|| panic!("condition '{}' is not registered", node.id));

        match def {
            ConditionDef::Between { property, value, .. } => {
                let label = between_label(property, value);
                self.alloc_single(node, rows, label, |row| between_matches(row, property, value))
            }
            ConditionDef::Identity { property, value, .. } => {
                let label = format!("{property} is {}", scalar::display(value));
                self.alloc_single(node, rows, label, |row| identity_matches(row, property, value))
            }
            ConditionDef::Comparison { property, value, .. } => {
                let label = format!(
                    "{property} {} {}",
                    value.operator.as_str(),
                    scalar::display(&value.value)
                );
                self.alloc_single(node, rows, label, |row| {
                    comparison_matches(row, property, value)
                })
            }
            ConditionDef::Values { property, values, .. } => {
                self.alloc_multi(node, rows, property, values, MultiKind::Values)
            }
            ConditionDef::Enums { property, values, .. } => {
                self.alloc_multi(node, rows, property, values, MultiKind::Enums)
            }
            ConditionDef::Ranges { property, values, .. } => {
                self.alloc_multi(node, rows, property, values, MultiKind::Ranges)
            }
            ConditionDef::Not { .. } | ConditionDef::And { .. } | ConditionDef::Or { .. }
            | ConditionDef::Bool { .. } => {
                let matcher = Matcher::compile(self.registry, def);
                let label = def.name().to_owned();
                self.alloc_single(node, rows, label, |row| matcher.matches(row))
            }
            ConditionDef::Reference { value, .. } => {
                panic!("reference stub to '{value}' is only valid while editing")
            }
        }
    }

    /// Shared shape of single-predicate allocation: partition, recurse into
    /// the node's children against the matched rows, and let the recursion's
    /// leftover bubble back up as this folder's own classified set.
    fn alloc_single(
        &self,
        node: &AllocationDefinition,
        rows: Vec<Row>,
        label: String,
        predicate: impl Fn(&Row) -> bool,
    ) -> AllocationOutput {
        let (mut classified, unclassified) = partition(rows, predicate);

        let mut children = Vec::new();
        if !classified.is_empty() {
            if let Some(mut nested) = self.interpret_siblings(&node.children, classified.clone())
            {
                classified = std::mem::take(&mut nested.unclassified);
                children = nested.children;
            }
        }
        AllocationOutput::folder(label, classified, unclassified, children)
    }

    /// Multi-valued allocation: one partitioning pass per entry over the rows
    /// still unmatched, buckets in entry order, the whole thing wrapped as a
    /// junction with the unmatched pool as its unclassified set.
    fn alloc_multi(
        &self,
        node: &AllocationDefinition,
        rows: Vec<Row>,
        property: &str,
        def_values: &[Value],
        kind: MultiKind,
    ) -> AllocationOutput {
        let mut entries = def_values.to_vec();
        if kind == MultiKind::Ranges {
            // Implicit overflow bucket; assumes the breakpoints are ascending.
            entries.push(Value::from(f64::MAX));
        }

        let mut pool = rows;
        let mut folders = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let (classified, rest) =
                partition(pool, |row| kind.entry_matches(row, property, entry));
            pool = rest;
            if classified.is_empty() {
                continue;
            }

            let label = kind.bucket_label(property, &entries, index);
            match self.interpret_siblings(&node.children, classified.clone()) {
                Some(mut nested) => {
                    // Rows the children left over stay classified at this
                    // bucket; they do not flow into later buckets.
                    nested.folder_name = label;
                    nested.classified = std::mem::take(&mut nested.unclassified);
                    folders.push(nested);
                }
                None => folders.push(AllocationOutput::folder(
                    label,
                    classified,
                    Vec::new(),
                    Vec::new(),
                )),
            }
        }

        AllocationOutput::folder(AllocationOutput::WRAPPER, Vec::new(), pool, folders)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultiKind {
    Values,
    Enums,
    Ranges,
}

impl MultiKind {
    fn entry_matches(self, row: &Row, property: &str, entry: &Value) -> bool {
        let actual = row.get(property);
        match self {
            Self::Values => actual.is_some_and(|value| scalar::values_equal(value, entry)),
            Self::Enums => entry.as_array().is_some_and(|members| {
                actual.is_some_and(|value| {
                    members.iter().any(|member| scalar::values_equal(value, member))
                })
            }),
            Self::Ranges => actual
                .and_then(|value| scalar::compare(value, entry))
                .is_some_and(|ordering| ordering == std::cmp::Ordering::Less),
        }
    }

    fn bucket_label(self, property: &str, entries: &[Value], index: usize) -> String {
        match self {
            Self::Values => format!("{property} = {}", scalar::display(&entries[index])),
            Self::Enums => format!("{property} IN {}", scalar::display(&entries[index])),
            Self::Ranges => {
                if index == 0 {
                    format!("{property} < {}", scalar::display(&entries[index]))
                } else if index == entries.len() - 1 {
                    format!("{property} > {}", scalar::display(&entries[index - 1]))
                } else {
                    format!(
                        "{property} BETWEEN {} AND {}",
                        scalar::display(&entries[index - 1]),
                        scalar::display(&entries[index])
                    )
                }
            }
        }
    }
}

fn between_label(property: &str, value: &BetweenValue) -> String {
    let low_glyph = if value.included[0] { " < " } else { " <= " };
    let high_glyph = if value.included[1] { " < " } else { " <= " };
    format!(
        "{}{low_glyph}{property}{high_glyph}{}",
        scalar::display(&value.range[0]),
        scalar::display(&value.range[1])
    )
}

/// Stable partition: every row is visited exactly once and relative order is
/// preserved in both buckets.
pub fn partition(rows: Vec<Row>, predicate: impl Fn(&Row) -> bool) -> (Vec<Row>, Vec<Row>) {
    let mut classified = Vec::new();
    let mut unclassified = Vec::new();
    for row in rows {
        if predicate(&row) {
            classified.push(row);
        } else {
            unclassified.push(row);
        }
    }
    (classified, unclassified)
}
