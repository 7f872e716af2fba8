// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Compiles composite conditions into short-circuiting matcher trees.
//!
//! Leaf predicates become closures over a single row; `and`/`or` hold ordered
//! child trees and stop at the first decisive operand; `not` inverts. Ids are
//! resolved transitively through the registry at compile time, so matching
//! itself never touches the registry.

use std::cmp::Ordering;

use serde_json::Value;

use crate::model::scalar;
use crate::model::{
    BetweenValue, ComparisonOperator, ComparisonValue, ConditionDef, ConditionsRegistry, Row,
};

#[derive(Debug)]
pub(crate) enum Matcher {
    Between { property: String, value: BetweenValue },
    Identity { property: String, value: Value },
    Comparison { property: String, value: ComparisonValue },
    Not(Box<Matcher>),
    All(Vec<Matcher>),
    Any(Vec<Matcher>),
    Const(bool),
}

impl Matcher {
    /// Traversal is unbounded; a cyclic definition graph will overflow the
    /// stack, and a dangling id panics. See the crate docs on executor input
    /// validation.
    pub(crate) fn compile(registry: &ConditionsRegistry, def: &ConditionDef) -> Matcher {
        match def {
            ConditionDef::Between { property, value, .. } => {
                Matcher::Between { property: property.clone(), value: value.clone() }
            }
            ConditionDef::Identity { property, value, .. } => {
                Matcher::Identity { property: property.clone(), value: value.clone() }
            }
            ConditionDef::Comparison { property, value, .. } => {
                Matcher::Comparison { property: property.clone(), value: value.clone() }
            }
            ConditionDef::Not { value, .. } => {
                Matcher::Not(Box::new(Self::compile(registry, fetch_def(registry, value))))
            }
            ConditionDef::Bool { value, .. } => Matcher::Const(*value),
            ConditionDef::And { values, .. } => Matcher::All(
                values
                    .iter()
                    .map(|id| Self::compile(registry, fetch_def(registry, id)))
                    .collect(),
            ),
            ConditionDef::Or { values, .. } => Matcher::Any(
                values
                    .iter()
                    .map(|id| Self::compile(registry, fetch_def(registry, id)))
                    .collect(),
            ),
            ConditionDef::Values { .. }
            | ConditionDef::Enums { .. }
            | ConditionDef::Ranges { .. } => panic!(
                "multi-valued condition '{}' cannot be an operand of a composite",
                def.id()
            ),
            ConditionDef::Reference { value, .. } => panic!(
                "reference stub to '{value}' is only valid while editing"
            ),
        }
    }

    pub(crate) fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Between { property, value } => between_matches(row, property, value),
            Self::Identity { property, value } => identity_matches(row, property, value),
            Self::Comparison { property, value } => comparison_matches(row, property, value),
            Self::Not(inner) => !inner.matches(row),
            Self::All(operands) => operands.iter().all(|operand| operand.matches(row)),
            Self::Any(operands) => operands.iter().any(|operand| operand.matches(row)),
            Self::Const(value) => *value,
        }
    }
}

fn fetch_def<'a>(registry: &'a ConditionsRegistry, id: &str) -> &'a ConditionDef {
    registry
        .fetch(id)
        .unwrap_or_else(|| panic!("condition '{id}' is not registered"))
}

pub(crate) fn between_matches(row: &Row, property: &str, value: &BetweenValue) -> bool {
    let Some(actual) = row.get(property) else {
        return false;
    };
    let (Some(low), Some(high)) = (
        scalar::compare(actual, &value.range[0]),
        scalar::compare(actual, &value.range[1]),
    ) else {
        return false;
    };
    if low == Ordering::Less || high == Ordering::Greater {
        return false;
    }
    if !value.included[0] && low == Ordering::Equal {
        return false;
    }
    if !value.included[1] && high == Ordering::Equal {
        return false;
    }
    true
}

pub(crate) fn identity_matches(row: &Row, property: &str, value: &Value) -> bool {
    row.get(property).is_some_and(|actual| scalar::values_equal(actual, value))
}

pub(crate) fn comparison_matches(row: &Row, property: &str, value: &ComparisonValue) -> bool {
    if value.operator == ComparisonOperator::Eq {
        return identity_matches(row, property, &value.value);
    }
    let Some(ordering) = row
        .get(property)
        .and_then(|actual| scalar::compare(actual, &value.value))
    else {
        return false;
    };
    match value.operator {
        ComparisonOperator::Lt => ordering == Ordering::Less,
        ComparisonOperator::Le => ordering != Ordering::Greater,
        ComparisonOperator::Ge => ordering != Ordering::Less,
        ComparisonOperator::Gt => ordering == Ordering::Greater,
        ComparisonOperator::Eq => unreachable!("handled above"),
    }
}
