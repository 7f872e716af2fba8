// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Read-only computations over condition registries: subtree flattening,
//! named-condition derivation, and integrity checking.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{Conditions, ConditionsRegistry, ConditionDef, NamedCondition};

/// Flattens the definitions making up `condition_id` in DFS post-order, so
/// children always precede their parents. Callers migrating a subtree between
/// registries rely on that order: each definition only depends on earlier
/// entries.
///
/// With `follow_references` false, a named non-root node is returned as an
/// opaque leaf instead of being expanded; named conditions act as reference
/// boundaries during editing and removal. Missing ids yield a `None`
/// placeholder (in-progress definitions) rather than an error. The root is
/// always expanded regardless of its name.
pub fn children_array(
    registry: &ConditionsRegistry,
    condition_id: &str,
    follow_references: bool,
) -> Vec<Option<ConditionDef>> {
    let mut flattened = Vec::new();
    collect_children(registry, condition_id, follow_references, true, &mut flattened);
    flattened
}

fn collect_children(
    registry: &ConditionsRegistry,
    condition_id: &str,
    follow_references: bool,
    is_root: bool,
    out: &mut Vec<Option<ConditionDef>>,
) {
    let Some(def) = registry.fetch(condition_id) else {
        out.push(None);
        return;
    };
    if !is_root && !follow_references && def.is_named() {
        out.push(Some(def.clone()));
        return;
    }

    match def {
        ConditionDef::And { values, .. } | ConditionDef::Or { values, .. } => {
            if values.is_empty() {
                out.push(None);
            } else {
                for child_id in values {
                    collect_children(registry, child_id, follow_references, false, out);
                }
            }
        }
        ConditionDef::Not { value, .. } => {
            collect_children(registry, value, follow_references, false, out);
        }
        _ => {}
    }

    out.push(Some(def.clone()));
}

/// True when `condition_id` is empty or its flattened subtree still contains
/// unresolved placeholders.
pub fn contains_wip_nodes(registry: &ConditionsRegistry, condition_id: &str) -> bool {
    if condition_id.is_empty() {
        return true;
    }
    children_array(registry, condition_id, false)
        .iter()
        .any(Option::is_none)
}

pub fn condition_name<'a>(registry: &'a ConditionsRegistry, condition_id: &str) -> &'a str {
    registry.fetch(condition_id).map_or("", ConditionDef::name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedConditionsError {
    DuplicateName { name: String, first_id: String, second_id: String },
}

impl fmt::Display for NamedConditionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name, first_id, second_id } => write!(
                f,
                "conditions {first_id} and {second_id} share the name '{name}'"
            ),
        }
    }
}

impl std::error::Error for NamedConditionsError {}

/// Derives the authoritative name-to-NamedCondition map purely from registry
/// contents.
///
/// First pass collects every named definition; a shared name is an error.
/// Second pass walks every definition's direct children and records a
/// back-reference on each named child, keyed by the parent's id. Duplicate
/// edges (the same parent listing the same named child twice) collapse into
/// one reference, mirroring the set semantics of the ledger.
pub fn build_named_conditions(
    registry: &ConditionsRegistry,
) -> Result<Conditions, NamedConditionsError> {
    let mut conditions = Conditions::new();
    for (id, def) in registry.iter() {
        if !def.is_named() {
            continue;
        }
        if let Some(existing) = conditions.get(def.name()) {
            return Err(NamedConditionsError::DuplicateName {
                name: def.name().to_owned(),
                first_id: existing.condition_id().to_owned(),
                second_id: id.clone(),
            });
        }
        conditions.insert(def.name().to_owned(), NamedCondition::new(def.name(), id.clone()));
    }

    for (parent_id, def) in registry.iter() {
        for child_id in def.direct_child_ids() {
            if child_id == parent_id {
                continue;
            }
            let Some(child) = registry.fetch(child_id) else {
                continue;
            };
            if !child.is_named() {
                continue;
            }
            let named = conditions
                .get_mut(child.name())
                .expect("named child collected in first pass");
            if !named.has_reference(parent_id) {
                named
                    .add_reference(parent_id.clone())
                    .expect("membership checked before add");
            }
        }
    }

    Ok(conditions)
}

/// True iff `conditions` matches the map rebuilt from scratch and every
/// anonymous definition is referenced by exactly one other definition.
pub fn integrity_check(registry: &ConditionsRegistry, conditions: &Conditions) -> bool {
    let Ok(rebuilt) = build_named_conditions(registry) else {
        return false;
    };
    if &rebuilt != conditions {
        return false;
    }

    let mut incoming: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, def) in registry.iter() {
        for child_id in def.direct_child_ids() {
            *incoming.entry(child_id).or_insert(0) += 1;
        }
    }
    registry
        .iter()
        .filter(|(_, def)| !def.is_named())
        .all(|(id, _)| incoming.get(id.as_str()) == Some(&1))
}
