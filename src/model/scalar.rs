// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Scalar equality, ordering, and display over `serde_json::Value`.
//!
//! Condition values and row properties are untyped JSON scalars. Numbers
//! compare numerically regardless of their integer/float representation;
//! strings compare lexicographically. Operands of different types (or a
//! missing operand) never compare, so predicates built on them never match.

use std::cmp::Ordering;

use serde_json::Value;

pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(left), Value::Number(right)) => left.as_f64() == right.as_f64(),
        _ => a == b,
    }
}

pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(left), Value::Number(right)) => {
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        _ => None,
    }
}

/// Human-readable rendering used in folder names and condition summaries.
/// Strings print without quotes; arrays print comma-joined.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            items.iter().map(display).collect::<Vec<_>>().join(", ")
        }
        other => other.to_string(),
    }
}
