//! Nearest-neighbor retrieval over a static question/answer corpus.

use crate::distance::normalized_distance;
use alfred_core::{AlfredError, Result};

/// One (normalized question, answer) pair from the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct DialoguePair {
    pub question: String,
    pub answer: String,
}

/// Linear-scan retriever over the dialogue corpus.
///
/// O(corpus size) per query, which is fine for the small corpora this
/// serves and for its position as the last resort before teach-on-the-fly.
#[derive(Debug, Clone, Default)]
pub struct DialogueRetriever {
    pairs: Vec<DialoguePair>,
}

impl DialogueRetriever {
    /// Parses a corpus of blank-line separated blocks, each holding a
    /// question line followed by an answer line. Blocks with fewer than
    /// two lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns a data-load error when no usable pair is found; the
    /// cascade cannot run without its retrieval corpus.
    pub fn from_corpus(content: &str) -> Result<Self> {
        let pairs: Vec<DialoguePair> = content
            .split("\n\n")
            .filter_map(|block| {
                let mut lines = block.lines();
                let question = lines.next()?.trim();
                let answer = lines.next()?.trim();
                (!question.is_empty() && !answer.is_empty()).then(|| DialoguePair {
                    question: question.to_string(),
                    answer: answer.to_string(),
                })
            })
            .collect();

        if pairs.is_empty() {
            return Err(AlfredError::data_load("dialogue corpus has no pairs"));
        }
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the answer whose question is closest to the query, when
    /// that minimal normalized distance is strictly below `threshold`.
    pub fn get_answer(&self, query: &str, threshold: f32) -> Option<&str> {
        let best = self
            .pairs
            .iter()
            .map(|pair| (normalized_distance(query, &pair.question), pair))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))?;

        let (dist, pair) = best;
        (dist < threshold).then_some(pair.answer.as_str())
    }
}
