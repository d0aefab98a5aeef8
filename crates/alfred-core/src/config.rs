//! Engine configuration.
//!
//! All tunables of the resolution cascade live here with explicit serde
//! defaults, so a partial `alfred.toml` (or none at all) always yields a
//! fully initialized configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of the dialogue engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Normalized-distance threshold for the fuzzy classification rescue.
    pub fuzzy_threshold: f32,
    /// Normalized-distance threshold for corpus retrieval.
    pub retrieval_threshold: f32,
    /// Maximum edit distance accepted by spelling correction.
    pub spelling_max_distance: usize,
    /// How many turns of history a session retains (oldest evicted first).
    pub history_capacity: usize,
    /// Minimum messages since the last promotional offer before another fires.
    pub ad_cooldown_messages: u32,
    /// Minimum hours since the last promotional offer before another fires.
    pub ad_cooldown_hours: i64,
    /// History length after which the one-time catalog offer is made.
    pub catalog_offer_min_history: usize,
    /// Sentiment below which the empathy prefix is added.
    pub empathy_threshold: f32,
    /// Sentiment above which the cheerful prefix is added.
    pub cheer_threshold: f32,
    /// Seed for the engine RNG. `None` means seed from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.25,
            retrieval_threshold: 0.40,
            spelling_max_distance: 2,
            history_capacity: 50,
            ad_cooldown_messages: 3,
            ad_cooldown_hours: 6,
            catalog_offer_min_history: 3,
            empathy_threshold: -0.2,
            cheer_threshold: 0.5,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from a TOML file.
    ///
    /// A missing file is not an error: defaults are returned, matching how
    /// the rest of the startup treats optional configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = EngineConfig::load("/nonexistent/alfred.toml").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "fuzzy_threshold = 0.3\nhistory_capacity = 10").unwrap();
        file.flush().unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.fuzzy_threshold, 0.3);
        assert_eq!(config.history_capacity, 10);
        // Untouched fields keep their defaults
        assert_eq!(config.retrieval_threshold, 0.40);
        assert_eq!(config.ad_cooldown_messages, 3);
    }

    #[test]
    fn test_default_thresholds_match_contract() {
        let config = EngineConfig::default();
        assert_eq!(config.fuzzy_threshold, 0.25);
        assert_eq!(config.retrieval_threshold, 0.40);
        assert_eq!(config.spelling_max_distance, 2);
    }
}
