//! Small-talk patterns.
//!
//! A fixed regex set for "how are you" phrasings answered from a small
//! canned pool, ahead of classification so the model never sees them.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::session::Session;
use regex::Regex;
use std::sync::OnceLock;

const PATTERNS: [&str; 4] = [
    r"\bкак (?:у тебя |твои )?дела\b",
    r"\bкак настроение\b",
    r"\bкак ты\b",
    r"\bч(?:то делаешь|ем занимаешься)\b",
];

const REPLIES: [&str; 3] = [
    "У меня всё отлично, спасибо, что спросил!",
    "Всё хорошо, болтаю с тобой и радуюсь.",
    "Лучше всех! Надеюсь, у тебя тоже всё хорошо.",
];

fn patterns() -> &'static Vec<Regex> {
    static PATTERN_SET: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERN_SET.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("small-talk pattern"))
            .collect()
    })
}

/// Stage 4: canned replies for mood/status questions.
pub fn small_talk(input: &TurnInput, _session: &mut Session, ctx: &EngineContext) -> Option<String> {
    let lower = input.raw.to_lowercase();
    if !patterns().iter().any(|re| re.is_match(&lower)) {
        return None;
    }
    ctx.choose(&REPLIES).map(|reply| reply.to_string())
}
