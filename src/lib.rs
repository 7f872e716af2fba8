// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Typed conditions over tabular data, and the allocation engine that
//! classifies datasets into folder trees with them.
//!
//! Conditions live in an id-keyed [`model::ConditionsRegistry`]; composites
//! point at other conditions by id, and named conditions are tracked with a
//! reference ledger so shared definitions cannot be edited or removed out
//! from under their users. [`ops::WorkspaceSession`] is the safe mutation
//! protocol, [`exec::AllocationExecutor`] the interpreter, and [`store`] the
//! persistence layer for whole workspaces.

pub mod exec;
pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod store;
