// SPDX-FileCopyrightText: 2026 Rubric contributors
// SPDX-License-Identifier: MIT

/// Issues unique, monotonically increasing string identifiers.
///
/// Ids are decimal integers rendered as strings because they double as JSON
/// object keys in the serialized registry format. A generator can be resumed
/// from the last id seen in a deserialized registry so freshly built
/// definitions never collide with restored ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    current: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { current: 1 }
    }

    /// Continues numbering after `last_id`. Falls back to a fresh counter when
    /// the id does not parse as an integer.
    pub fn resuming(last_id: &str) -> Self {
        match last_id.trim().parse::<u64>() {
            Ok(last) => Self { current: last.saturating_add(1) },
            Err(_) => Self::new(),
        }
    }

    /// Returns the current counter as a string and advances it.
    pub fn next_id(&mut self) -> String {
        let mut buf = itoa::Buffer::new();
        let id = buf.format(self.current).to_owned();
        self.current += 1;
        id
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
