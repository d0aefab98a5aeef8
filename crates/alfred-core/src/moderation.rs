//! Content-moderation pre-filter.
//!
//! Runs on the raw input before the resolution cascade and may short-circuit
//! the whole turn with a fixed refusal. Two keyword classes: insults get a
//! "no insults, please" reply, prohibited topics get a refusal to help.

use std::collections::BTreeSet;

/// Keyword-based input filter.
#[derive(Debug, Clone, Default)]
pub struct ModerationFilter {
    toxic: BTreeSet<String>,
    prohibited: BTreeSet<String>,
}

impl ModerationFilter {
    pub fn new(
        toxic: impl IntoIterator<Item = String>,
        prohibited: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            toxic: toxic.into_iter().collect(),
            prohibited: prohibited.into_iter().collect(),
        }
    }

    /// Inspects a raw utterance. `Some(reply)` short-circuits the cascade.
    pub fn check(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        if self.toxic.iter().any(|word| lower.contains(word.as_str())) {
            return Some("Пожалуйста, без оскорблений.");
        }
        if self
            .prohibited
            .iter()
            .any(|word| lower.contains(word.as_str()))
        {
            return Some("Извини, в этом я помочь не могу.");
        }
        None
    }
}

/// Returns the built-in filter with the stock keyword lists.
pub fn get_default_moderation() -> ModerationFilter {
    let toxic = ["дурак", "тупой", "идиот", "мудак", "дебил", "лох", "ублюдок", "сдохни", "бесишь"];
    let prohibited = ["взрыв", "бомба", "убить"];
    ModerationFilter::new(
        toxic.iter().map(|s| s.to_string()),
        prohibited.iter().map(|s| s.to_string()),
    )
}
