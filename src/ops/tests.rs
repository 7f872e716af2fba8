// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

use rstest::{fixture, rstest};
use serde_json::json;

use crate::model::{ComparisonOperator, ComparisonValue, ConditionDef, Grammar, Workspace};
use crate::query;

use super::{ConditionsBuilder, SessionError, WorkspaceSession};

// -- builder ----------------------------------------------------------------

#[test]
fn builder_assigns_sequential_ids_from_one() {
    let mut builder = ConditionsBuilder::new();
    let first = builder.build_identity("country", json!("BG"), "");
    let second = builder.build_bool(true, "");

    assert_eq!(first.id(), "1");
    assert_eq!(second.id(), "2");
    assert_eq!(builder.registry().last_id(), Some("2"));
}

#[test]
fn builder_resumed_from_a_registry_continues_past_its_last_id() {
    let mut builder = ConditionsBuilder::new();
    builder.build_identity("country", json!("BG"), "");
    builder.build_identity("country", json!("UK"), "");

    let mut resumed = ConditionsBuilder::from_registry(builder.into_registry());
    let next = resumed.build_bool(false, "");
    assert_eq!(next.id(), "3");
}

#[test]
fn import_deep_copies_under_a_fresh_id() {
    let mut source = ConditionsBuilder::new();
    let original = source.build_identity("country", json!("BG"), "in BG");

    let mut target = ConditionsBuilder::new();
    target.build_bool(true, "");
    let copy = target.import_condition(&original);

    assert_eq!(copy.id(), "2");
    assert_eq!(copy.name(), "in BG");
    assert_eq!(target.registry().fetch("2"), Some(&copy));
    // The source registry is untouched.
    assert_eq!(source.registry().fetch("1"), Some(&original));
}

#[test]
fn remove_condition_stops_at_named_boundaries() {
    let mut builder = ConditionsBuilder::new();
    let named_leaf = builder.build_identity("country", json!("BG"), "in BG");
    let anon_leaf = builder.build_comparison(
        "salary",
        ComparisonValue { operator: ComparisonOperator::Gt, value: json!(200) },
        "",
    );
    let root = builder.build_and(
        vec![named_leaf.id().to_owned(), anon_leaf.id().to_owned()],
        "rich BG",
    );

    let removed = builder.remove_condition(root.id());

    let removed_ids: Vec<&str> = removed.iter().map(ConditionDef::id).collect();
    assert_eq!(removed_ids, [anon_leaf.id(), root.id()]);
    assert!(builder.registry().fetch(root.id()).is_none());
    assert!(builder.registry().fetch(anon_leaf.id()).is_none());
    // The named child is owned elsewhere and survives.
    assert!(builder.registry().fetch(named_leaf.id()).is_some());
}

// -- session fixtures -------------------------------------------------------

/// A workspace holding three saved conditions: "in BG" (1) and "high salary"
/// (2), both referenced by the composite "rich BG" (3).
#[fixture]
fn session() -> WorkspaceSession {
    let mut builder = ConditionsBuilder::new();
    builder.build_identity("country", json!("BG"), "in BG");
    builder.build_comparison(
        "salary",
        ComparisonValue { operator: ComparisonOperator::Gt, value: json!(200) },
        "high salary",
    );
    builder.build_and(vec!["1".to_owned(), "2".to_owned()], "rich BG");

    let registry = builder.into_registry();
    let conditions = query::build_named_conditions(&registry).unwrap();
    WorkspaceSession::new(Workspace::with_parts(
        "test",
        Vec::new(),
        Grammar::default(),
        registry,
        conditions,
        Vec::new(),
    ))
}

fn transient_root_id(session: &mut WorkspaceSession, name: &str) -> String {
    session
        .transient()
        .registry()
        .iter()
        .find(|(_, def)| def.name() == name && !matches!(def, ConditionDef::Reference { .. }))
        .map(|(id, _)| id.clone())
        .expect("edited condition present in the transient registry")
}

// -- loading ----------------------------------------------------------------

#[rstest]
fn loading_requires_a_non_empty_id(mut session: WorkspaceSession) {
    let err = session.load_condition_for_edit("").unwrap_err();
    assert_eq!(err, SessionError::BadId);
    assert_eq!(err.code(), "BAD_ID");
}

#[rstest]
fn loading_twice_without_saving_is_refused(mut session: WorkspaceSession) {
    session.load_condition_for_edit("3").unwrap();

    let err = session.load_condition_for_edit("3").unwrap_err();
    assert_eq!(err.code(), "EDIT_IN_PROGRESS");
}

#[rstest]
fn loading_an_unknown_id_fails(mut session: WorkspaceSession) {
    let err = session.load_condition_for_edit("42").unwrap_err();
    assert_eq!(err, SessionError::IdNotFound { id: "42".to_owned() });
    assert_eq!(err.code(), "ID_NOT_FOUND");
}

#[rstest]
fn loading_an_anonymous_condition_fails(mut session: WorkspaceSession) {
    // Anonymous operands only live inside their parent; save one through the
    // session and target it directly.
    let id = {
        let transient = session.transient();
        let anon = transient.build_identity("country", json!("US"), "");
        transient.build_not(anon.id(), "not US").id().to_owned()
    };
    session.save_condition(&id, false, None).unwrap();
    let saved_root = session.workspace().conditions()["not US"].condition_id().to_owned();
    let ConditionDef::Not { value: anon_id, .. } =
        session.workspace().registry().fetch(&saved_root).unwrap().clone()
    else {
        panic!("saved root should be a negation");
    };

    let err = session.load_condition_for_edit(&anon_id).unwrap_err();
    assert_eq!(err.code(), "UNNAMED_ID");
}

#[rstest]
fn loading_a_referenced_condition_fails(mut session: WorkspaceSession) {
    let err = session.load_condition_for_edit("1").unwrap_err();
    assert_eq!(err, SessionError::Referenced { name: "in BG".to_owned() });
    assert_eq!(err.code(), "REFERENCED");
}

#[rstest]
fn loading_copies_the_subtree_with_named_children_as_stubs(mut session: WorkspaceSession) {
    session.load_condition_for_edit("3").unwrap();
    assert!(session.is_editing());

    let root_id = transient_root_id(&mut session, "rich BG");
    let transient = session.transient().registry();
    assert_eq!(transient.size(), 3);

    let ConditionDef::And { values, .. } = transient.fetch(&root_id).unwrap() else {
        panic!("edited root should stay a composite");
    };
    // Operand pointers were remapped onto the transient stubs.
    let operand_names: Vec<&str> = values
        .iter()
        .map(|id| transient.fetch(id).unwrap())
        .map(|def| match def {
            ConditionDef::Reference { value, .. } => value.as_str(),
            other => panic!("named operand should load as a stub, got {}", other.kind()),
        })
        .collect();
    assert_eq!(operand_names, ["in BG", "high salary"]);
}

#[rstest]
fn loading_copies_anonymous_children_verbatim(mut session: WorkspaceSession) {
    // A composite over one anonymous operand, saved through the session.
    let not_id = {
        let transient = session.transient();
        let anon = transient.build_identity("country", json!("US"), "");
        transient.build_not(anon.id(), "not US").id().to_owned()
    };
    session.save_condition(&not_id, false, None).unwrap();

    let saved_root = session.workspace().conditions()["not US"].condition_id().to_owned();
    session.load_condition_for_edit(&saved_root).unwrap();

    let root_id = transient_root_id(&mut session, "not US");
    let transient = session.transient().registry();
    let ConditionDef::Not { value, .. } = transient.fetch(&root_id).unwrap() else {
        panic!("edited root should stay a negation");
    };
    let operand = transient.fetch(value).unwrap();
    assert_eq!(operand.kind(), "identity");
    assert!(!operand.is_named());
}

#[rstest]
fn discarding_an_edit_clears_the_transient_registry(mut session: WorkspaceSession) {
    session.load_condition_for_edit("3").unwrap();
    session.discard_edit();

    assert!(!session.is_editing());
    assert!(session.transient().registry().is_empty());
}

// -- saving -----------------------------------------------------------------

#[rstest]
fn saving_without_an_edit_in_progress_fails(mut session: WorkspaceSession) {
    let err = session.save_condition("1", false, None).unwrap_err();
    assert_eq!(err, SessionError::NotEditing);
    assert_eq!(err.code(), "NOT_EDITING");
}

#[rstest]
fn saving_an_id_missing_from_the_transient_registry_fails(mut session: WorkspaceSession) {
    session.transient().build_bool(true, "always");

    let err = session.save_condition("42", false, None).unwrap_err();
    assert_eq!(err.code(), "ID_NOT_FOUND");
}

#[rstest]
fn saving_an_anonymous_root_fails(mut session: WorkspaceSession) {
    let id = session.transient().build_bool(true, "").id().to_owned();

    let err = session.save_condition(&id, false, None).unwrap_err();
    assert_eq!(err.code(), "UNNAMED_ID");
}

#[rstest]
fn updating_a_condition_that_never_existed_fails(mut session: WorkspaceSession) {
    let id = session.transient().build_bool(true, "always").id().to_owned();

    let err = session.save_condition(&id, true, Some("ghost")).unwrap_err();
    assert_eq!(err, SessionError::MissingOriginal { name: "ghost".to_owned() });
    assert_eq!(err.code(), "MISSING_ORIGINAL");
}

#[rstest]
fn saving_under_a_taken_name_fails(mut session: WorkspaceSession) {
    let id = session.transient().build_bool(true, "in BG").id().to_owned();

    let err = session.save_condition(&id, false, None).unwrap_err();
    assert_eq!(err, SessionError::NameInUse { name: "in BG".to_owned() });
    assert_eq!(err.code(), "NAME_IN_USE");
}

#[rstest]
fn saving_a_stub_to_a_nonexistent_condition_fails(mut session: WorkspaceSession) {
    let id = {
        let transient = session.transient();
        let stub = transient.build_reference("ghost");
        transient.build_not(stub.id(), "anti ghost").id().to_owned()
    };

    let err = session.save_condition(&id, false, None).unwrap_err();
    assert_eq!(err, SessionError::BrokenRef { name: "ghost".to_owned() });
    assert_eq!(err.code(), "BROKEN_REF");
}

#[rstest]
fn updating_with_a_stub_naming_the_replaced_condition_fails(mut session: WorkspaceSession) {
    session.load_condition_for_edit("3").unwrap();
    let root_id = transient_root_id(&mut session, "rich BG");

    // Graft a stub pointing back at the very condition being replaced.
    let stub_id = session.transient().build_reference("rich BG").id().to_owned();
    let mut def = session.transient().registry().fetch(&root_id).unwrap().clone();
    if let ConditionDef::And { values, .. } = &mut def {
        values.push(stub_id);
    }
    session.transient().registry_mut().register(def);

    let before = session.workspace().clone();
    let err = session.save_condition(&root_id, true, Some("rich BG")).unwrap_err();
    assert_eq!(err, SessionError::BrokenRef { name: "rich BG".to_owned() });
    assert_eq!(err.code(), "BROKEN_REF");
    assert_eq!(session.workspace(), &before);
}

#[rstest]
fn failed_saves_leave_the_workspace_untouched(mut session: WorkspaceSession) {
    let before = session.workspace().clone();
    let id = {
        let transient = session.transient();
        let stub = transient.build_reference("ghost");
        transient.build_not(stub.id(), "anti ghost").id().to_owned()
    };

    assert!(session.save_condition(&id, false, None).is_err());
    assert_eq!(session.workspace(), &before);
    // The edit survives a failed save for another attempt.
    assert!(session.is_editing());
}

#[rstest]
fn saving_a_new_condition_migrates_it_and_records_back_references(
    mut session: WorkspaceSession,
) {
    let id = {
        let transient = session.transient();
        let stub = transient.build_reference("in BG");
        transient.build_not(stub.id(), "not in BG").id().to_owned()
    };
    session.save_condition(&id, false, None).unwrap();

    assert!(!session.is_editing());
    let workspace = session.workspace();
    let saved = &workspace.conditions()["not in BG"];
    let root = workspace.registry().fetch(saved.condition_id()).unwrap();

    // The stub collapsed into a direct pointer at the referenced condition.
    assert_eq!(root.direct_child_ids(), ["1"]);
    assert!(workspace.conditions()["in BG"].has_reference(saved.condition_id()));
    assert!(query::integrity_check(workspace.registry(), workspace.conditions()));
}

#[rstest]
fn saving_with_update_replaces_the_old_subtree(mut session: WorkspaceSession) {
    session.load_condition_for_edit("3").unwrap();
    let root_id = transient_root_id(&mut session, "rich BG");
    session.save_condition(&root_id, true, Some("rich BG")).unwrap();

    let workspace = session.workspace();
    // The composite was re-imported under a fresh id; the old one is gone.
    let new_root = workspace.conditions()["rich BG"].condition_id().to_owned();
    assert_ne!(new_root, "3");
    assert!(workspace.registry().fetch("3").is_none());

    let def = workspace.registry().fetch(&new_root).unwrap();
    assert_eq!(def.direct_child_ids(), ["1", "2"]);
    assert!(workspace.conditions()["in BG"].has_reference(&new_root));
    assert!(workspace.conditions()["high salary"].has_reference(&new_root));
    assert!(query::integrity_check(workspace.registry(), workspace.conditions()));
}

#[rstest]
fn saving_under_a_new_name_retires_the_old_one(mut session: WorkspaceSession) {
    session.load_condition_for_edit("3").unwrap();
    let root_id = transient_root_id(&mut session, "rich BG");

    // Rename the edited root before saving over the original.
    let renamed = {
        let registry = session.transient().registry();
        let mut def = registry.fetch(&root_id).unwrap().clone();
        if let ConditionDef::And { name, .. } = &mut def {
            *name = "wealthy BG".to_owned();
        }
        def
    };
    session.transient().registry_mut().register(renamed);
    session.save_condition(&root_id, true, Some("rich BG")).unwrap();

    let workspace = session.workspace();
    assert!(!workspace.conditions().contains_key("rich BG"));
    assert!(workspace.conditions().contains_key("wealthy BG"));
    assert!(query::integrity_check(workspace.registry(), workspace.conditions()));
}

// -- removal ----------------------------------------------------------------

#[rstest]
fn removing_a_referenced_condition_fails_without_side_effects(
    mut session: WorkspaceSession,
) {
    let before = session.workspace().clone();

    let err = session.remove_condition("1").unwrap_err();
    assert_eq!(err.code(), "REFERENCED");
    assert_eq!(session.workspace(), &before);
}

#[rstest]
fn removal_unwinds_the_references_the_subtree_held(mut session: WorkspaceSession) {
    session.remove_condition("3").unwrap();

    let workspace = session.workspace();
    assert!(workspace.registry().fetch("3").is_none());
    assert!(!workspace.conditions().contains_key("rich BG"));
    // The operands are free again and can now be removed themselves.
    assert!(workspace.conditions()["in BG"].can_remove());
    assert!(workspace.conditions()["high salary"].can_remove());
    assert!(query::integrity_check(workspace.registry(), workspace.conditions()));

    session.remove_condition("1").unwrap();
    assert!(!session.workspace().conditions().contains_key("in BG"));
}

#[rstest]
fn a_full_edit_cycle_preserves_registry_integrity(mut session: WorkspaceSession) {
    // Edit and re-save the composite, grow a new condition on top of it,
    // then tear everything down again.
    session.load_condition_for_edit("3").unwrap();
    let root_id = transient_root_id(&mut session, "rich BG");
    session.save_condition(&root_id, true, Some("rich BG")).unwrap();

    let not_id = {
        let transient = session.transient();
        let stub = transient.build_reference("rich BG");
        transient.build_not(stub.id(), "everyone else").id().to_owned()
    };
    session.save_condition(&not_id, false, None).unwrap();

    let everyone_else =
        session.workspace().conditions()["everyone else"].condition_id().to_owned();
    session.remove_condition(&everyone_else).unwrap();
    let rich_bg = session.workspace().conditions()["rich BG"].condition_id().to_owned();
    session.remove_condition(&rich_bg).unwrap();

    let workspace = session.workspace();
    assert_eq!(workspace.registry().size(), 2);
    assert_eq!(workspace.conditions().len(), 2);
    assert!(query::integrity_check(workspace.registry(), workspace.conditions()));
}
