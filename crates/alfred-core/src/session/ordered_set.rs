//! An insertion-ordered set of strings with sequence serialization.
//!
//! Session state tracks several "already used" collections (follow-up
//! prompts asked, products shown). These need set semantics in memory but a
//! stable, explicit representation on disk, so they serialize as a plain
//! ordered sequence rather than a native set type.

use serde::{Deserialize, Serialize};

/// Insertion-ordered collection of unique strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSet {
    items: Vec<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning `true` if it was not already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}
