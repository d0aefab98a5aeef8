//! Lexicon-based sentiment scoring.

use std::collections::HashMap;

/// Scores normalized text by averaging per-word lexicon coefficients.
///
/// Unknown words contribute 0.0; empty input scores 0.0. With lexicon
/// coefficients in [-1, +1] the average stays in the same range.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    lexicon: HashMap<String, f32>,
}

impl SentimentScorer {
    pub fn new(lexicon: HashMap<String, f32>) -> Self {
        Self { lexicon }
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    /// Mean lexicon score of the words in `text`.
    pub fn score(&self, text: &str) -> f32 {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }
        let total: f32 = words
            .iter()
            .map(|word| self.lexicon.get(*word).copied().unwrap_or(0.0))
            .sum();
        total / words.len() as f32
    }
}
