//! Intent classification.
//!
//! Two layers: [`IntentModel`] is the inference side of a linear classifier
//! trained offline (word 1-2-gram plus char 3-5-gram TF-IDF features,
//! one decision row per class), loaded as a serialized artifact.
//! [`IntentResolver`] wraps it with the fuzzy-distance rescue that catches
//! short or novel phrasings lying lexically close to a known example.

use crate::distance::normalized_distance;
use alfred_core::{AlfredError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which n-gram source a TF-IDF block reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    Word,
    Char,
}

/// One TF-IDF vectorizer block: a term vocabulary with idf weights.
///
/// Term frequencies are sublinear (`1 + ln(tf)`) and each block is
/// L2-normalized independently before the blocks are stacked, matching the
/// training pipeline that produced the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfBlock {
    pub analyzer: Analyzer,
    pub ngram_min: usize,
    pub ngram_max: usize,
    /// term → block-local column
    pub vocabulary: HashMap<String, u32>,
    /// idf weight per column
    pub idf: Vec<f32>,
}

impl TfidfBlock {
    /// Number of columns this block contributes.
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    fn ngrams(&self, text: &str) -> Vec<String> {
        let mut grams = Vec::new();
        match self.analyzer {
            Analyzer::Word => {
                let tokens: Vec<&str> = text.split_whitespace().collect();
                for n in self.ngram_min..=self.ngram_max {
                    if n == 0 || tokens.len() < n {
                        continue;
                    }
                    for window in tokens.windows(n) {
                        grams.push(window.join(" "));
                    }
                }
            }
            Analyzer::Char => {
                let chars: Vec<char> = text.chars().collect();
                for n in self.ngram_min..=self.ngram_max {
                    if n == 0 || chars.len() < n {
                        continue;
                    }
                    for window in chars.windows(n) {
                        grams.push(window.iter().collect());
                    }
                }
            }
        }
        grams
    }

    /// Sparse L2-normalized feature vector over block-local columns.
    fn features(&self, text: &str) -> HashMap<u32, f32> {
        let mut counts: HashMap<u32, f32> = HashMap::new();
        for gram in self.ngrams(text) {
            if let Some(&col) = self.vocabulary.get(&gram) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut features: HashMap<u32, f32> = counts
            .into_iter()
            .map(|(col, tf)| {
                let idf = self.idf.get(col as usize).copied().unwrap_or(1.0);
                (col, (1.0 + tf.ln()) * idf)
            })
            .collect();

        let norm: f32 = features.values().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in features.values_mut() {
                *value /= norm;
            }
        }
        features
    }
}

/// Serialized inference artifact of the offline-trained intent classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentModel {
    /// Class labels, aligned with `coefficients` and `intercepts`
    pub classes: Vec<String>,
    pub word: TfidfBlock,
    pub char: TfidfBlock,
    /// Sparse decision row per class over the stacked feature space
    /// (word columns first, then char columns)
    pub coefficients: Vec<Vec<(u32, f32)>>,
    pub intercepts: Vec<f32>,
}

impl IntentModel {
    /// Predicts the most likely intent id for normalized text.
    ///
    /// # Errors
    ///
    /// Returns a classification error when the artifact is degenerate
    /// (no classes, or misaligned decision rows).
    pub fn predict(&self, text: &str) -> Result<String> {
        if self.classes.is_empty() {
            return Err(AlfredError::classification("model has no classes"));
        }
        if self.coefficients.len() != self.classes.len()
            || self.intercepts.len() != self.classes.len()
        {
            return Err(AlfredError::classification(
                "decision rows are not aligned with classes",
            ));
        }

        let word_dim = self.word.dim() as u32;
        let mut features = self.word.features(text);
        for (col, value) in self.char.features(text) {
            features.insert(word_dim + col, value);
        }

        let mut best: Option<(usize, f32)> = None;
        for (class_idx, row) in self.coefficients.iter().enumerate() {
            let mut score = self.intercepts[class_idx];
            for &(col, weight) in row {
                if let Some(value) = features.get(&col) {
                    score += weight * value;
                }
            }
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if better {
                best = Some((class_idx, score));
            }
        }

        // Non-empty classes guarantee a winner
        let (class_idx, _) = best.expect("at least one class");
        Ok(self.classes[class_idx].clone())
    }
}

/// Intent resolution: direct model inference with a fuzzy-distance rescue.
pub struct IntentResolver {
    model: Option<IntentModel>,
    /// (intent id, normalized examples) in definition order
    examples: Vec<(String, Vec<String>)>,
}

impl IntentResolver {
    /// Builds a resolver. `model: None` means no artifact was available;
    /// `classify` then fails (recoverably) and the fuzzy scan decides alone.
    pub fn new(model: Option<IntentModel>, examples: Vec<(String, Vec<String>)>) -> Self {
        Self { model, examples }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Direct classification through the trained model.
    pub fn classify(&self, text: &str) -> Result<String> {
        match &self.model {
            Some(model) => model.predict(text),
            None => Err(AlfredError::classification("no model artifact loaded")),
        }
    }

    /// Classification with the fuzzy rescue.
    ///
    /// Accepts the direct result when the input lies within `threshold`
    /// (normalized edit distance) of one of that intent's examples.
    /// Otherwise scans every intent's examples for the single globally
    /// closest one and returns its owner when under `threshold`; failing
    /// that, falls back to the direct result.
    pub fn classify_fuzzy(&self, text: &str, threshold: f32) -> Result<String> {
        let direct = self.classify(text).ok();

        if let Some(intent_id) = &direct {
            if let Some(best) = self.best_distance_within(intent_id, text) {
                if best < threshold {
                    return Ok(intent_id.clone());
                }
            }
        }

        let mut best: Option<(&str, f32)> = None;
        for (intent_id, examples) in &self.examples {
            for example in examples {
                let dist = normalized_distance(text, example);
                if dist < best.map_or(threshold, |(_, d)| d) {
                    best = Some((intent_id, dist));
                }
            }
        }
        if let Some((intent_id, _)) = best {
            return Ok(intent_id.to_string());
        }

        direct.ok_or_else(|| {
            AlfredError::classification("no intent within fuzzy threshold and no direct result")
        })
    }

    fn best_distance_within(&self, intent_id: &str, text: &str) -> Option<f32> {
        let (_, examples) = self.examples.iter().find(|(id, _)| id == intent_id)?;
        examples
            .iter()
            .map(|example| normalized_distance(text, example))
            .min_by(|a, b| a.total_cmp(b))
    }
}
