// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Persistence for workspaces and other named entities.
//!
//! A [`FileStorage`] is a flat namespace of text files; [`MemoryStorage`]
//! backs tests and [`DirStorage`] maps the namespace onto one directory on
//! disk. [`Persistence`] pairs a storage with a [`Serializer`] to save and
//! load typed entities under prefixed, validated file names.

pub mod dir_storage;
pub mod memory;
pub mod persistence;

pub use dir_storage::DirStorage;
pub use memory::MemoryStorage;
pub use persistence::{Persistence, Serializer};

/// A flat store of text files addressed by name.
///
/// All operations are total: failures surface as `false` or `None`, never as
/// errors, so callers can treat a broken backend like an empty one.
pub trait FileStorage {
    /// Writes `content` under `path`. Returns `false` if the file already
    /// exists or the write fails; existing files are never overwritten.
    fn save(&mut self, path: &str, content: &str) -> bool;

    fn exists(&self, path: &str) -> bool;

    /// Returns `None` if the file does not exist or cannot be read.
    fn load(&self, path: &str) -> Option<String>;

    /// Returns every path the storage holds, or `None` if the backend cannot
    /// be enumerated.
    fn list_paths(&self) -> Option<Vec<String>>;
}
