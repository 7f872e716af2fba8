// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Typed constructors for every condition kind.
//!
//! Each `build_*` method allocates a fresh id, shapes the definition,
//! registers it, and returns a copy of what was stored. An empty `name`
//! produces an anonymous, structural definition.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{
    BetweenValue, ComparisonValue, ConditionDef, ConditionsRegistry, IdGenerator,
};
use crate::query;

#[derive(Debug, Clone, Default)]
pub struct ConditionsBuilder {
    ids: IdGenerator,
    registry: ConditionsRegistry,
}

impl ConditionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(ids: IdGenerator, registry: ConditionsRegistry) -> Self {
        Self { ids, registry }
    }

    /// Wraps an existing registry, resuming id generation after its last
    /// registered id.
    pub fn from_registry(registry: ConditionsRegistry) -> Self {
        let ids = match registry.last_id() {
            Some(last) => IdGenerator::resuming(last),
            None => IdGenerator::new(),
        };
        Self { ids, registry }
    }

    pub fn registry(&self) -> &ConditionsRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConditionsRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> ConditionsRegistry {
        self.registry
    }

    fn finish(&mut self, def: ConditionDef) -> ConditionDef {
        self.registry.register(def.clone());
        def
    }

    pub fn build_identity(
        &mut self,
        property: &str,
        value: Value,
        name: &str,
    ) -> ConditionDef {
        let def = ConditionDef::Identity {
            id: self.ids.next_id(),
            name: name.to_owned(),
            property: property.to_owned(),
            value,
        };
        self.finish(def)
    }

    pub fn build_between(
        &mut self,
        property: &str,
        value: BetweenValue,
        name: &str,
    ) -> ConditionDef {
        let def = ConditionDef::Between {
            id: self.ids.next_id(),
            name: name.to_owned(),
            property: property.to_owned(),
            value,
        };
        self.finish(def)
    }

    pub fn build_comparison(
        &mut self,
        property: &str,
        value: ComparisonValue,
        name: &str,
    ) -> ConditionDef {
        let def = ConditionDef::Comparison {
            id: self.ids.next_id(),
            name: name.to_owned(),
            property: property.to_owned(),
            value,
        };
        self.finish(def)
    }

    pub fn build_values(
        &mut self,
        property: &str,
        values: Vec<Value>,
        name: &str,
    ) -> ConditionDef {
        let def = ConditionDef::Values {
            id: self.ids.next_id(),
            name: name.to_owned(),
            property: property.to_owned(),
            values,
        };
        self.finish(def)
    }

    pub fn build_enums(
        &mut self,
        property: &str,
        values: Vec<Vec<Value>>,
        name: &str,
    ) -> ConditionDef {
        let def = ConditionDef::Enums {
            id: self.ids.next_id(),
            name: name.to_owned(),
            property: property.to_owned(),
            values: values.into_iter().map(Value::Array).collect(),
        };
        self.finish(def)
    }

    /// Breakpoints are expected ascending; this is not validated here, and an
    /// unsorted list produces misleading buckets during allocation.
    pub fn build_ranges(
        &mut self,
        property: &str,
        values: Vec<Value>,
        name: &str,
    ) -> ConditionDef {
        let def = ConditionDef::Ranges {
            id: self.ids.next_id(),
            name: name.to_owned(),
            property: property.to_owned(),
            values,
        };
        self.finish(def)
    }

    pub fn build_not(&mut self, value_id: &str, name: &str) -> ConditionDef {
        let def = ConditionDef::Not {
            id: self.ids.next_id(),
            name: name.to_owned(),
            value: value_id.to_owned(),
        };
        self.finish(def)
    }

    pub fn build_and(&mut self, value_ids: Vec<String>, name: &str) -> ConditionDef {
        let def = ConditionDef::And {
            id: self.ids.next_id(),
            name: name.to_owned(),
            values: value_ids,
        };
        self.finish(def)
    }

    pub fn build_or(&mut self, value_ids: Vec<String>, name: &str) -> ConditionDef {
        let def = ConditionDef::Or {
            id: self.ids.next_id(),
            name: name.to_owned(),
            values: value_ids,
        };
        self.finish(def)
    }

    pub fn build_bool(&mut self, value: bool, name: &str) -> ConditionDef {
        let def = ConditionDef::Bool {
            id: self.ids.next_id(),
            name: name.to_owned(),
            value,
        };
        self.finish(def)
    }

    /// Editing-only stub standing in for the named condition `name`.
    pub fn build_reference(&mut self, name: &str) -> ConditionDef {
        let def = ConditionDef::Reference {
            id: self.ids.next_id(),
            name: name.to_owned(),
            value: name.to_owned(),
        };
        self.finish(def)
    }

    /// Deep-copies `def` into this builder's registry under a fresh id and
    /// returns the copy. Internal pointers are left untouched; callers remap
    /// them when migrating whole subtrees.
    pub fn import_condition(&mut self, def: &ConditionDef) -> ConditionDef {
        import_into(&mut self.ids, &mut self.registry, def)
    }

    /// Removes the subtree rooted at `id` down to the first named boundary
    /// and returns the removed definitions, children before parents. Named
    /// descendants are opaque leaves owned elsewhere and stay registered.
    pub fn remove_condition(&mut self, id: &str) -> Vec<ConditionDef> {
        remove_subtree(&mut self.registry, id)
    }

    /// Rewrites internal pointers of `def` through `map` before importing,
    /// the combination every cross-registry migration needs.
    pub(crate) fn import_remapped(
        &mut self,
        def: &ConditionDef,
        map: &BTreeMap<String, String>,
    ) -> ConditionDef {
        let mut copy = def.clone();
        copy.remap_child_ids(map);
        self.import_condition(&copy)
    }
}

pub(crate) fn import_into(
    ids: &mut IdGenerator,
    registry: &mut ConditionsRegistry,
    def: &ConditionDef,
) -> ConditionDef {
    let mut copy = def.clone();
    copy.set_id(ids.next_id());
    registry.register(copy.clone());
    copy
}

pub(crate) fn remove_subtree(
    registry: &mut ConditionsRegistry,
    id: &str,
) -> Vec<ConditionDef> {
    let removed: Vec<ConditionDef> = query::children_array(registry, id, false)
        .into_iter()
        .flatten()
        .filter(|def| !def.is_named() || def.id() == id)
        .collect();
    for def in &removed {
        registry.remove(def.id());
    }
    removed
}
