//! The resolution cascade.
//!
//! Each stage is a plain handler function over (turn input, session,
//! context): it either produces the turn's reply (terminating the cascade)
//! or returns `None` to pass control on. The fixed priority order lives in
//! the two slices below: short-circuit stages reply as-is, resolution
//! stages get the sentiment tone prefix applied by the engine.

pub mod classify;
pub mod commands;
pub mod game;
pub mod preference;
pub mod promo;
pub mod recommend;
pub mod retrieve;
pub mod shopping;
pub mod smalltalk;
pub mod teach;

#[cfg(test)]
pub(crate) mod testutil;

use crate::context::EngineContext;
use alfred_core::session::Session;
use chrono::{DateTime, Utc};

/// Everything a stage may read about the current turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// The utterance exactly as the transport delivered it
    pub raw: String,
    /// The normalizer's view of the utterance
    pub normalized: String,
    /// Turn timestamp, shared by every stage
    pub now: DateTime<Utc>,
}

impl TurnInput {
    pub fn new(raw: &str, ctx: &EngineContext, now: DateTime<Utc>) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: ctx.normalizer.normalize(raw),
            now,
        }
    }
}

/// A cascade stage handler.
pub type StageFn = fn(&TurnInput, &mut Session, &EngineContext) -> Option<String>;

/// Stages 1-11 plus the explicit reset command: first match wins, replies
/// are returned without the tone prefix.
pub const SHORT_CIRCUIT_STAGES: &[(&str, StageFn)] = &[
    ("active_game", game::active_game),
    ("capture_taught_reply", teach::capture_taught_reply),
    ("reset_command", commands::reset_command),
    ("custom_answer_lookup", teach::custom_answer_lookup),
    ("small_talk", smalltalk::small_talk),
    ("pending_genre", recommend::pending_genre),
    ("promo_triggers", promo::promo_triggers),
    ("catalog_browsing", shopping::catalog_browsing),
    ("preference_learning", preference::preference_learning),
    ("repeat_request", recommend::repeat_request),
    ("game_launch", game::game_launch),
    ("pending_pref_topic", preference::pending_pref_topic),
];

/// Stages 13-15: classification, retrieval, teach-on-the-fly. The engine
/// prefixes their replies with the sentiment tone. `learn_unknown` always
/// produces a reply, so the cascade terminates in bounded steps.
pub const RESOLUTION_STAGES: &[(&str, StageFn)] = &[
    ("classify_intent", classify::classify_intent),
    ("retrieve_answer", retrieve::retrieve_answer),
    ("learn_unknown", teach::learn_unknown),
];
