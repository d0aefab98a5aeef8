//! Utterance normalization.
//!
//! Pipeline: lowercase and strip noise characters, collapse whitespace,
//! spell-correct each token against the known vocabulary, then reduce
//! tokens to base forms through the morphology collaborator. Deterministic
//! given a fixed vocabulary.

use crate::distance::levenshtein;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

/// External morphological collaborator that reduces a token to its lemma.
///
/// Real deployments plug in a dictionary-backed lemmatizer; the engine only
/// relies on the mapping being stable.
pub trait Morphology: Send + Sync {
    fn lemma(&self, token: &str) -> String;
}

/// Pass-through morphology: every token is its own lemma.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMorphology;

impl Morphology for IdentityMorphology {
    fn lemma(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Lowercases, keeps Cyrillic/Latin letters, digits and hyphens, replaces
/// everything else with spaces, and collapses runs of whitespace.
pub fn clean_text(text: &str) -> String {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let noise = NOISE.get_or_init(|| Regex::new(r"[^а-яёa-z0-9\s\-]").unwrap());
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").unwrap());

    let lower = text.to_lowercase();
    let cleaned = noise.replace_all(&lower, " ");
    spaces.replace_all(&cleaned, " ").trim().to_string()
}

/// Normalizes raw utterances against a known vocabulary.
pub struct TextNormalizer {
    vocabulary: BTreeSet<String>,
    morphology: Arc<dyn Morphology>,
    max_correction_distance: usize,
}

impl TextNormalizer {
    /// Builds a normalizer over the given vocabulary (typically all intent
    /// example tokens plus corpus question tokens).
    pub fn new(
        vocabulary: impl IntoIterator<Item = String>,
        morphology: Arc<dyn Morphology>,
        max_correction_distance: usize,
    ) -> Self {
        Self {
            vocabulary: vocabulary.into_iter().collect(),
            morphology,
            max_correction_distance,
        }
    }

    /// Normalizes one utterance: clean, spell-correct, lemmatize.
    pub fn normalize(&self, raw: &str) -> String {
        clean_text(raw)
            .split_whitespace()
            .map(|token| {
                let corrected = self.correct_spelling(token);
                self.morphology.lemma(&corrected)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the token unchanged when it is in the vocabulary; otherwise
    /// the closest vocabulary word within the correction distance, with
    /// candidates limited to a length delta of the same bound.
    fn correct_spelling(&self, token: &str) -> String {
        if self.vocabulary.contains(token) {
            return token.to_string();
        }
        let token_len = token.chars().count();
        let max_dist = self.max_correction_distance;

        let best = self
            .vocabulary
            .iter()
            .filter(|word| word.chars().count().abs_diff(token_len) <= max_dist)
            .map(|word| (levenshtein(word, token), word))
            .min_by_key(|&(dist, _)| dist);

        match best {
            Some((dist, word)) if dist <= max_dist => word.clone(),
            _ => token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(words: &[&str]) -> TextNormalizer {
        TextNormalizer::new(
            words.iter().map(|w| w.to_string()),
            Arc::new(IdentityMorphology),
            2,
        )
    }

    #[test]
    fn test_clean_text_strips_noise() {
        assert_eq!(clean_text("Привет!!! Как дела???"), "привет как дела");
        assert_eq!(clean_text("e-mail: test@mail.ru"), "e-mail test mail ru");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_clean_text_keeps_hyphens_and_digits() {
        assert_eq!(clean_text("Krestiki-Noliki 3x3"), "krestiki-noliki 3x3");
    }

    #[test]
    fn test_known_word_kept_verbatim() {
        let n = normalizer(&["привет", "дела"]);
        assert_eq!(n.normalize("привет"), "привет");
    }

    #[test]
    fn test_misspelling_corrected_within_distance() {
        let n = normalizer(&["привет", "дела"]);
        assert_eq!(n.normalize("превет"), "привет");
        assert_eq!(n.normalize("делла"), "дела");
    }

    #[test]
    fn test_distant_token_kept_as_is() {
        let n = normalizer(&["привет"]);
        assert_eq!(n.normalize("длинноеслово"), "длинноеслово");
    }

    #[test]
    fn test_morphology_applied_after_correction() {
        struct StripYo;
        impl Morphology for StripYo {
            fn lemma(&self, token: &str) -> String {
                token.replace('ё', "е")
            }
        }
        let n = TextNormalizer::new(
            ["ёлка".to_string()],
            Arc::new(StripYo),
            2,
        );
        assert_eq!(n.normalize("ёлка"), "елка");
    }

    #[test]
    fn test_empty_input_normalizes_to_empty() {
        let n = normalizer(&["привет"]);
        assert_eq!(n.normalize("?!..."), "");
    }
}
