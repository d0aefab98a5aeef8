//! Preference learning: «мой любимый X …».
//!
//! A statement with a value stores it; a bare mention of a known topic is
//! answered from memory; an unknown topic gets a question and a pending
//! `awaiting_pref_topic` expectation that the next turn resolves.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::session::Session;
use regex::Regex;
use std::sync::OnceLock;

fn favorite_pattern() -> &'static Regex {
    static FAVORITE: OnceLock<Regex> = OnceLock::new();
    FAVORITE.get_or_init(|| {
        Regex::new(r"(?:мой|моя|моё|мое)\s+любим(?:ый|ая|ое|ые)\s+([а-яёa-z\-]+)\s*(.*)")
            .expect("favorite pattern")
    })
}

/// Strips the connective between topic and value («— Титаник», «: джаз»,
/// «это осень»).
fn clean_value(raw: &str) -> String {
    let mut value = raw.trim_start_matches(['-', '—', ':', ',', ' ']);
    if value.to_lowercase().starts_with("это ") {
        value = &value["это ".len()..];
    }
    value.trim().to_string()
}

/// Stage 8: the «мой любимый X» pattern.
pub fn preference_learning(
    input: &TurnInput,
    session: &mut Session,
    _ctx: &EngineContext,
) -> Option<String> {
    let lower = input.raw.to_lowercase();
    let caps = favorite_pattern().captures(&lower)?;
    let topic = caps.get(1)?.as_str().to_string();
    let value = clean_value(caps.get(2).map(|m| m.as_str()).unwrap_or(""));

    if !value.is_empty() {
        session.preferences.insert(topic.clone(), value.clone());
        return Some(format!("Запомнил: любимый {topic} — {value}."));
    }
    if let Some(known) = session.preferences.get(&topic) {
        return Some(format!("Ты говорил, что твой любимый {topic} — {known}."));
    }
    session.awaiting_pref_topic = Some(topic.clone());
    Some(format!("А какой у тебя любимый {topic}? Расскажи, я запомню."))
}

/// Stage 11: the answer to a pending preference question.
pub fn pending_pref_topic(
    input: &TurnInput,
    session: &mut Session,
    _ctx: &EngineContext,
) -> Option<String> {
    let topic = session.awaiting_pref_topic.take()?;
    let value = clean_value(input.raw.trim());
    if value.is_empty() {
        return None;
    }
    session.preferences.insert(topic.clone(), value.clone());
    Some(format!("Запомнил! Любимый {topic} — {value}."))
}
