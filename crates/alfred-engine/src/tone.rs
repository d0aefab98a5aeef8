//! Sentiment-derived tone prefix.
//!
//! Computed once per turn and prepended to whatever the resolution stages
//! (classification, retrieval, teach-on-the-fly) produce. Short-circuit
//! stages and clarifying prompts stay tone-free.

use alfred_core::config::EngineConfig;

/// Maps a sentiment score to the reply prefix.
pub fn tone_prefix(score: f32, config: &EngineConfig) -> &'static str {
    if score < config.empathy_threshold {
        "Мне очень жаль, что тебе грустно. "
    } else if score > config.cheer_threshold {
        "Рад, что у тебя хорошее настроение! "
    } else {
        ""
    }
}
