// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Plain-text presentation of condition definitions.
//!
//! Two levels of detail: [`describe_condition`] produces a one-line summary
//! of a single definition, and [`condition_outline`] expands a definition id
//! into an indented multi-line view of its whole subtree. Both are pure
//! formatting; neither mutates the registry, and lookup failures come back as
//! error strings rather than panics so a half-built definition can still be
//! shown.

use crate::model::scalar;
use crate::model::{ConditionDef, ConditionsRegistry};

/// Outline depth cap, for indentation sanity and to catch cyclic graphs.
pub const MAX_OUTLINE_DEPTH: usize = 20;

/// Placeholder shown for a definition that is still being assembled.
pub const WIP_PLACEHOLDER: &str = "<WIP>";

/// One-line summary of a definition. Composite operands are shown by name,
/// not expanded; use [`condition_outline`] for the full tree.
pub fn describe_condition(registry: &ConditionsRegistry, def: &ConditionDef) -> String {
    match def {
        ConditionDef::Between { property, value, .. } => {
            let low_glyph = if value.included[0] { " < " } else { " <= " };
            let high_glyph = if value.included[1] { " < " } else { " <= " };
            format!(
                "{}{low_glyph}{property}{high_glyph}{}",
                scalar::display(&value.range[0]),
                scalar::display(&value.range[1])
            )
        }
        ConditionDef::Identity { property, value, .. } => {
            format!("{property} is {}", scalar::display(value))
        }
        ConditionDef::Comparison { property, value, .. } => {
            format!("{property} {} {}", value.operator.as_str(), scalar::display(&value.value))
        }
        ConditionDef::Values { property, values, .. } => {
            let entries: Vec<String> = values.iter().map(scalar::display).collect();
            format!("{property} in: ( {} )", entries.join(" | "))
        }
        ConditionDef::Enums { property, values, .. } => {
            let entries: Vec<String> = values.iter().map(scalar::display).collect();
            format!("{property} in: ( {} )", entries.join(" | "))
        }
        ConditionDef::Ranges { property, values, .. } => {
            let mut points = vec!["-∞".to_owned()];
            points.extend(values.iter().map(scalar::display));
            points.push("+∞".to_owned());
            format!("{property} in: ( {} )", points.join(" ⟺ "))
        }
        ConditionDef::Not { value, .. } => {
            format!("Not ({})", operand_name(registry, value))
        }
        ConditionDef::And { values, .. } => composite_summary(registry, values, "AND"),
        ConditionDef::Or { values, .. } => composite_summary(registry, values, "OR"),
        ConditionDef::Bool { value, .. } => {
            if *value { "Is true".to_owned() } else { "Is false".to_owned() }
        }
        ConditionDef::Reference { value, .. } => format!("Condition(\"{value}\")"),
    }
}

fn composite_summary(registry: &ConditionsRegistry, ids: &[String], operator: &str) -> String {
    let names: Vec<&str> = ids.iter().map(|id| operand_name(registry, id)).collect();
    format!("{{{}}}", names.join(&format!(" {operator} ")))
}

fn operand_name<'a>(registry: &'a ConditionsRegistry, id: &str) -> &'a str {
    registry.fetch(id).map_or("?", |def| def.name())
}

/// Indented multi-line expansion of the subtree under `id`. The empty id
/// stands for a definition still under construction and renders as
/// [`WIP_PLACEHOLDER`].
pub fn condition_outline(registry: &ConditionsRegistry, id: &str) -> String {
    outline(registry, id, 1)
}

fn outline(registry: &ConditionsRegistry, id: &str, depth: usize) -> String {
    if id.is_empty() {
        return WIP_PLACEHOLDER.to_owned();
    }
    if depth > MAX_OUTLINE_DEPTH {
        return "ERROR: maximum outline depth exceeded".to_owned();
    }
    let Some(def) = registry.fetch(id) else {
        return format!("ERROR: condition '{id}' is not registered");
    };

    let indent = format!("\n{}", " ".repeat(depth * 2));
    match def {
        ConditionDef::And { values, .. } => {
            let lines: Vec<String> = values
                .iter()
                .map(|child| format!("{indent}{}", outline(registry, child, depth + 1)))
                .collect();
            format!("AND:{}", lines.concat())
        }
        ConditionDef::Or { values, .. } => {
            let lines: Vec<String> = values
                .iter()
                .map(|child| format!("{indent}{}", outline(registry, child, depth + 1)))
                .collect();
            format!("OR:{}", lines.concat())
        }
        ConditionDef::Not { value, .. } => {
            format!("NOT{indent}{}", outline(registry, value, depth + 1))
        }
        ConditionDef::Bool { value, .. } => {
            if *value { "TRUE".to_owned() } else { "FALSE".to_owned() }
        }
        _ => describe_condition(registry, def),
    }
}
