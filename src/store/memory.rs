// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! In-memory [`FileStorage`] used by tests and throwaway sessions.

use std::collections::BTreeMap;

use super::FileStorage;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileStorage for MemoryStorage {
    fn save(&mut self, path: &str, content: &str) -> bool {
        if self.files.contains_key(path) {
            return false;
        }
        self.files.insert(path.to_owned(), content.to_owned());
        true
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn load(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn list_paths(&self) -> Option<Vec<String>> {
        Some(self.files.keys().cloned().collect())
    }
}
