// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

//! [`FileStorage`] over a single directory on disk.
//!
//! Paths are plain file names inside the root directory; anything that looks
//! like a traversal (separators, `..`) is rejected outright. I/O failures
//! degrade to the trait's `false`/`None` outcomes.

use std::fs;
use std::path::{Path, PathBuf};

use super::FileStorage;

#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        if path.is_empty()
            || path == ".."
            || path.contains('/')
            || path.contains('\\')
        {
            return None;
        }
        Some(self.root.join(path))
    }
}

impl FileStorage for DirStorage {
    fn save(&mut self, path: &str, content: &str) -> bool {
        let Some(file) = self.resolve(path) else {
            return false;
        };
        if file.exists() {
            return false;
        }
        if fs::create_dir_all(&self.root).is_err() {
            return false;
        }
        fs::write(&file, content).is_ok()
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|file| file.is_file())
    }

    fn load(&self, path: &str) -> Option<String> {
        fs::read_to_string(self.resolve(path)?).ok()
    }

    fn list_paths(&self) -> Option<Vec<String>> {
        let entries = fs::read_dir(&self.root).ok()?;
        let mut paths = Vec::new();
        for entry in entries.flatten() {
            if entry.path().is_file() {
                paths.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        paths.sort();
        Some(paths)
    }
}
