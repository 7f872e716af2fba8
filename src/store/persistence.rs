// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! Typed save/load on top of a [`FileStorage`].
//!
//! A [`Serializer`] turns an entity into text and back and names the file it
//! lives in: a fixed per-type prefix plus the entity's own identifier. File
//! names must be word characters only, which keeps them portable across
//! storage backends.

use std::sync::OnceLock;

use regex::Regex;

use super::FileStorage;

/// Converts one entity type to and from its stored text form.
pub trait Serializer {
    type Entity;

    fn to_str(&self, entity: &Self::Entity) -> String;

    /// Returns `None` for text this serializer does not understand, including
    /// documents written by a later major format version.
    fn from_str(&self, text: &str) -> Option<Self::Entity>;

    /// The entity's own name, unique within its type.
    fn identifier(&self, entity: &Self::Entity) -> String;

    /// File name prefix shared by every entity of this type.
    fn prefix(&self) -> &'static str;
}

fn valid_file_name() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\w+$").expect("file name pattern parses"))
}

pub struct Persistence<S, F> {
    serializer: S,
    storage: F,
}

impl<S: Serializer, F: FileStorage> Persistence<S, F> {
    pub fn new(serializer: S, storage: F) -> Self {
        Self { serializer, storage }
    }

    pub fn storage(&self) -> &F {
        &self.storage
    }

    /// Saves `entity` under its prefixed identifier. Returns `false` when a
    /// file with that name already exists or the write fails.
    pub fn save(&mut self, entity: &S::Entity) -> bool {
        let file_name = format!("{}{}", self.serializer.prefix(), self.serializer.identifier(entity));
        if !valid_file_name().is_match(&file_name) || self.storage.exists(&file_name) {
            return false;
        }
        self.storage.save(&file_name, &self.serializer.to_str(entity))
    }

    /// Loads the entity stored under `identifier`, or `None` if the name is
    /// invalid, the file is missing, or the text does not deserialize.
    pub fn load(&self, identifier: &str) -> Option<S::Entity> {
        if identifier.is_empty() {
            return None;
        }
        let file_name = format!("{}{identifier}", self.serializer.prefix());
        if !valid_file_name().is_match(&file_name) || !self.storage.exists(&file_name) {
            return None;
        }
        self.serializer.from_str(&self.storage.load(&file_name)?)
    }

    /// Lists every stored file name carrying this serializer's prefix, or
    /// `None` when the backend cannot be enumerated.
    pub fn list_directory(&self) -> Option<Vec<String>> {
        let prefix = self.serializer.prefix();
        let paths = self.storage.list_paths()?;
        Some(paths.into_iter().filter(|path| path.starts_with(prefix)).collect())
    }
}
