// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! The condition repository: a flat id-to-definition map.
//!
//! A registry owns every definition transitively reachable from its named
//! roots plus all anonymous internal nodes. Serialization is a plain JSON
//! object keyed by id; `BTreeMap` keeps the key order stable so round-trips
//! are deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::condition::ConditionDef;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionsRegistry {
    defs: BTreeMap<String, ConditionDef>,
    last_id: Option<String>,
}

impl ConditionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `def` under its own id, overwriting any previous entry. A
    /// definition with an empty id is silently ignored.
    pub fn register(&mut self, def: ConditionDef) {
        if def.id().is_empty() {
            return;
        }
        self.last_id = Some(def.id().to_owned());
        self.defs.insert(def.id().to_owned(), def);
    }

    pub fn fetch(&self, id: &str) -> Option<&ConditionDef> {
        self.defs.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<ConditionDef> {
        self.defs.remove(id)
    }

    pub fn clear(&mut self) {
        self.defs.clear();
        self.last_id = None;
    }

    pub fn size(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Id most recently passed to `register`, used to resume id generation.
    pub fn last_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    /// Snapshot of the id-to-definition mapping, independent of later
    /// registry mutation.
    pub fn shallow_copy(&self) -> BTreeMap<String, ConditionDef> {
        self.defs.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConditionDef)> {
        self.defs.iter()
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.defs).expect("registry serializes to JSON")
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn from_defs(defs: BTreeMap<String, ConditionDef>) -> Self {
        let mut registry = Self::new();
        for def in defs.into_values() {
            registry.register(def);
        }
        // Deserialization loses the original registration order, so resume
        // numbering from the numerically greatest id to rule out collisions.
        registry.last_id = registry
            .defs
            .keys()
            .max_by_key(|id| id.parse::<u64>().ok())
            .cloned();
        registry
    }
}

impl Serialize for ConditionsRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.defs.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConditionsRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let defs = BTreeMap::<String, ConditionDef>::deserialize(deserializer)?;
        Ok(Self::from_defs(defs))
    }
}
