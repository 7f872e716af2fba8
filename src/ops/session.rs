// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Session protocol for editing named conditions.
//!
//! A session owns the workspace (whose registry is the permanent home of all
//! saved conditions) and a transient builder used as scratch space for the
//! condition currently under edit. The transient registry is empty while
//! idle; loading a condition populates it, saving or abandoning clears it.
//! Every operation validates fully before mutating anything, so a failed
//! call leaves the workspace byte-for-byte unchanged.

use std::collections::BTreeMap;

use crate::model::{ConditionDef, IdGenerator, NamedCondition, Workspace};
use crate::ops::builder::{import_into, remove_subtree};
use crate::ops::{ConditionsBuilder, SessionError};
use crate::query;

#[derive(Debug)]
pub struct WorkspaceSession {
    workspace: Workspace,
    permanent_ids: IdGenerator,
    transient: ConditionsBuilder,
}

impl WorkspaceSession {
    pub fn new(workspace: Workspace) -> Self {
        let permanent_ids = match workspace.registry().last_id() {
            Some(last) => IdGenerator::resuming(last),
            None => IdGenerator::new(),
        };
        Self { workspace, permanent_ids, transient: ConditionsBuilder::new() }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    /// Scratch registry of the edit in progress. Editors build and rearrange
    /// definitions here before `save_condition` migrates them.
    pub fn transient(&mut self) -> &mut ConditionsBuilder {
        &mut self.transient
    }

    pub fn is_editing(&self) -> bool {
        !self.transient.registry().is_empty()
    }

    /// Abandons the edit in progress, if any.
    pub fn discard_edit(&mut self) {
        self.transient = ConditionsBuilder::new();
    }

    /// Shared validation for operations addressing a permanent named
    /// condition. Checks run in a fixed order and never mutate state.
    fn fetch_if_valid(&self, id: &str) -> Result<ConditionDef, SessionError> {
        if id.is_empty() {
            return Err(SessionError::BadId);
        }
        if self.is_editing() {
            return Err(SessionError::EditInProgress);
        }
        let def = self
            .workspace
            .registry()
            .fetch(id)
            .ok_or_else(|| SessionError::IdNotFound { id: id.to_owned() })?;
        let named = self
            .workspace
            .conditions()
            .get(def.name())
            .ok_or_else(|| SessionError::UnnamedId { id: id.to_owned() })?;
        if !named.can_remove() {
            return Err(SessionError::Referenced { name: named.name().to_owned() });
        }
        Ok(def.clone())
    }

    /// Copies the named condition `id` into the transient registry for
    /// editing. Named descendants become `reference` stubs instead of copies;
    /// internal pointers are remapped to the freshly minted transient ids.
    pub fn load_condition_for_edit(&mut self, id: &str) -> Result<(), SessionError> {
        let root = self.fetch_if_valid(id)?;
        let components = query::children_array(self.workspace.registry(), id, false);

        self.transient = ConditionsBuilder::new();
        let mut remapped: BTreeMap<String, String> = BTreeMap::new();
        for component in components.into_iter().flatten() {
            let old_id = component.id().to_owned();
            let new_id = if old_id != root.id() && component.is_named() {
                self.transient.build_reference(component.name()).id().to_owned()
            } else {
                self.transient.import_remapped(&component, &remapped).id().to_owned()
            };
            remapped.insert(old_id, new_id);
        }
        Ok(())
    }

    /// Migrates the edited condition rooted at the transient id `id` into the
    /// permanent registry. With `update_existing`, the named condition
    /// previously called `old_name` is replaced.
    pub fn save_condition(
        &mut self,
        id: &str,
        update_existing: bool,
        old_name: Option<&str>,
    ) -> Result<(), SessionError> {
        if !self.is_editing() {
            return Err(SessionError::NotEditing);
        }
        let root = self
            .transient
            .registry()
            .fetch(id)
            .cloned()
            .ok_or_else(|| SessionError::IdNotFound { id: id.to_owned() })?;
        if !root.is_named() {
            return Err(SessionError::UnnamedId { id: id.to_owned() });
        }
        let old_name = old_name.unwrap_or("");
        if update_existing && !self.workspace.conditions().contains_key(old_name) {
            return Err(SessionError::MissingOriginal { name: old_name.to_owned() });
        }
        let overwriting_same_name = update_existing && old_name == root.name();
        if self.workspace.conditions().contains_key(root.name()) && !overwriting_same_name {
            return Err(SessionError::NameInUse { name: root.name().to_owned() });
        }

        let components: Vec<ConditionDef> =
            query::children_array(self.transient.registry(), id, false)
                .into_iter()
                .flatten()
                .collect();
        for component in &components {
            if let ConditionDef::Reference { value, .. } = component {
                // A stub naming the condition being replaced would resolve to
                // the subtree removed below; reject it with the rest of the
                // dangling stubs while the workspace is still untouched.
                if !self.workspace.conditions().contains_key(value)
                    || (update_existing && value.as_str() == old_name)
                {
                    return Err(SessionError::BrokenRef { name: value.clone() });
                }
            }
        }

        // Validation done; mutation starts here.
        if update_existing {
            let old_root_id = self.workspace.conditions()[old_name].condition_id().to_owned();
            self.remove_from_permanent(&old_root_id);
        }

        // Children precede parents, so by the time a composite is imported
        // every pointer it holds already has a permanent mapping.
        let mut remapped: BTreeMap<String, String> = BTreeMap::new();
        let mut imported: Vec<ConditionDef> = Vec::new();
        for component in &components {
            let old_id = component.id().to_owned();
            if let ConditionDef::Reference { value, .. } = component {
                let target_id = self.workspace.conditions()[value].condition_id().to_owned();
                remapped.insert(old_id, target_id);
                continue;
            }
            let mut copy = component.clone();
            copy.remap_child_ids(&remapped);
            let def = import_into(
                &mut self.permanent_ids,
                self.workspace.registry_mut(),
                &copy,
            );
            remapped.insert(old_id, def.id().to_owned());
            imported.push(def);
        }

        // Record back-references from imported composites onto the named
        // conditions their pointers now land on.
        for def in &imported {
            let parent_id = def.id().to_owned();
            let named_children: Vec<String> = def
                .direct_child_ids()
                .into_iter()
                .filter(|child_id| *child_id != parent_id)
                .filter_map(|child_id| self.workspace.registry().fetch(child_id))
                .filter(|child| child.is_named())
                .map(|child| child.name().to_owned())
                .collect();
            for child_name in named_children {
                let named = self
                    .workspace
                    .conditions_mut()
                    .get_mut(&child_name)
                    .expect("named child present in conditions map");
                if !named.has_reference(&parent_id) {
                    named
                        .add_reference(parent_id.clone())
                        .expect("membership checked before add");
                }
            }
        }

        let new_root_id = remapped[root.id()].clone();
        self.workspace
            .conditions_mut()
            .insert(root.name().to_owned(), NamedCondition::new(root.name(), new_root_id));
        self.transient = ConditionsBuilder::new();
        Ok(())
    }

    /// Removes the named condition `id` from the permanent registry,
    /// unwinding the back-references its subtree held on other named
    /// conditions.
    pub fn remove_condition(&mut self, id: &str) -> Result<(), SessionError> {
        self.fetch_if_valid(id)?;
        self.remove_from_permanent(id);
        Ok(())
    }

    /// Removal without the validity gate, used internally when replacing a
    /// known-valid condition during save.
    fn remove_from_permanent(&mut self, id: &str) {
        let root_name = self
            .workspace
            .registry()
            .fetch(id)
            .filter(|def| def.is_named())
            .map(|def| def.name().to_owned());

        let removed = remove_subtree(self.workspace.registry_mut(), id);

        // Children precede parents in `removed`, so back-references unwind
        // before anything depending on them goes away. Unnamed children are
        // already gone from the registry; the fetch filters them out. The set
        // collapses duplicate edges the same way save records them.
        let mut unwound: std::collections::BTreeSet<(String, String)> =
            std::collections::BTreeSet::new();
        for def in &removed {
            for child_id in def.direct_child_ids() {
                let Some(child) = self.workspace.registry().fetch(child_id) else {
                    continue;
                };
                if child.is_named() {
                    unwound.insert((child.name().to_owned(), def.id().to_owned()));
                }
            }
        }
        for (child_name, parent_id) in unwound {
            if let Some(named) = self.workspace.conditions_mut().get_mut(&child_name) {
                named
                    .remove_reference(&parent_id)
                    .expect("reference ledger in sync with registry");
            }
        }

        if let Some(name) = root_name {
            self.workspace.conditions_mut().remove(&name);
        }
    }
}
