//! Text processing for the Alfred engine.
//!
//! Everything here is deterministic and side-effect free given fixed data:
//! normalization with spell correction, lexicon sentiment scoring, intent
//! classification (linear-model inference plus a fuzzy-distance rescue),
//! and nearest-neighbor retrieval over a question/answer corpus.

pub mod classifier;
pub mod distance;
pub mod normalize;
pub mod retrieval;
pub mod sentiment;

pub use classifier::{IntentModel, IntentResolver};
pub use distance::{levenshtein, normalized_distance};
pub use normalize::{clean_text, IdentityMorphology, Morphology, TextNormalizer};
pub use retrieval::DialogueRetriever;
pub use sentiment::SentimentScorer;
