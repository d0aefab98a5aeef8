//! Intent definitions and the learned-intent overlay contract.
//!
//! An intent is a named category of user meaning: example utterances the
//! classifier was trained on, canned responses, and optional follow-up
//! prompts. The static definition set is loaded once at startup and merged
//! with a mutable overlay of intents taught at runtime; overlay entries are
//! appended during conversations and never deleted mid-session.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named category of user meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Unique intent identifier, e.g. `greeting` or `learned_kak_dela`
    pub id: String,
    /// Example utterances, in definition order
    pub examples: Vec<String>,
    /// Canned responses, in definition order
    pub responses: Vec<String>,
    /// Optional follow-up prompts appended to keep the conversation going
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub followups: Vec<String>,
}

impl Intent {
    /// Creates an intent with a single example and a single response, the
    /// shape produced by teach-on-the-fly.
    pub fn learned(id: impl Into<String>, example: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            examples: vec![example.into()],
            responses: vec![response.into()],
            followups: Vec::new(),
        }
    }
}

/// The merged view of static intent definitions plus the learned overlay.
///
/// Lookup order favors static definitions: a learned intent can never
/// shadow a shipped one (ids are namespaced by the `learned_` prefix in
/// practice, so collisions do not occur in normal operation).
#[derive(Debug, Clone, Default)]
pub struct IntentSet {
    intents: Vec<Intent>,
    index: HashMap<String, usize>,
}

impl IntentSet {
    /// Builds the merged set from static definitions and the overlay.
    pub fn new(static_intents: Vec<Intent>, learned: Vec<Intent>) -> Self {
        let mut set = Self::default();
        for intent in static_intents.into_iter().chain(learned) {
            set.insert(intent);
        }
        set
    }

    /// Inserts or replaces an intent by id.
    pub fn insert(&mut self, intent: Intent) {
        match self.index.get(&intent.id) {
            Some(&pos) => self.intents[pos] = intent,
            None => {
                self.index.insert(intent.id.clone(), self.intents.len());
                self.intents.push(intent);
            }
        }
    }

    /// Looks up an intent by id.
    pub fn get(&self, id: &str) -> Option<&Intent> {
        self.index.get(id).map(|&pos| &self.intents[pos])
    }

    /// Replaces the responses of an existing intent.
    ///
    /// Returns `false` if the intent is unknown.
    pub fn set_response(&mut self, id: &str, response: impl Into<String>) -> bool {
        match self.index.get(id) {
            Some(&pos) => {
                self.intents[pos].responses = vec![response.into()];
                true
            }
            None => false,
        }
    }

    /// Iterates over all intents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// An abstract store for intents taught at runtime.
///
/// The engine appends a stub entry whenever an utterance resolves to
/// nothing, then fills in the user-supplied response on the next turn.
/// Implementations persist the overlay so taught intents survive restarts.
#[async_trait]
pub trait LearnedIntentRepository: Send + Sync {
    /// Loads every learned intent, in the order they were taught.
    async fn load_all(&self) -> Result<Vec<Intent>>;

    /// Appends a newly taught intent to the overlay.
    async fn append(&self, intent: &Intent) -> Result<()>;

    /// Replaces the stored response of a learned intent.
    async fn set_response(&self, intent_id: &str, response: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> Intent {
        Intent {
            id: id.to_string(),
            examples: vec!["пример".to_string()],
            responses: vec!["ответ".to_string()],
            followups: Vec::new(),
        }
    }

    #[test]
    fn test_merge_keeps_insertion_order() {
        let set = IntentSet::new(vec![sample("a"), sample("b")], vec![sample("c")]);
        let ids: Vec<_> = set.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_replaces_by_id() {
        let mut set = IntentSet::new(vec![sample("a")], vec![]);
        let mut updated = sample("a");
        updated.responses = vec!["другой ответ".to_string()];
        set.insert(updated);

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").unwrap().responses[0], "другой ответ");
    }

    #[test]
    fn test_set_response_unknown_id() {
        let mut set = IntentSet::default();
        assert!(!set.set_response("missing", "ответ"));
    }

    #[test]
    fn test_learned_constructor_shape() {
        let intent = Intent::learned("learned_x", "как у тебя дела", "нормально");
        assert_eq!(intent.examples.len(), 1);
        assert_eq!(intent.responses, vec!["нормально".to_string()]);
        assert!(intent.followups.is_empty());
    }
}
