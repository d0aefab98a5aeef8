//! Teach-on-the-fly stages.
//!
//! Three pieces of one mechanism: when nothing resolves an utterance,
//! `learn_unknown` registers a stub intent and asks the user what to
//! answer; `capture_taught_reply` stores the next turn verbatim as that
//! answer; `custom_answer_lookup` serves taught answers on exact repeats.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::intent::Intent;
use alfred_core::session::Session;

/// The fixed "don't understand" placeholder returned when a stub intent is
/// created. The next user turn becomes the taught reply.
pub const TEACH_PLACEHOLDER: &str =
    "Извини, я пока не знаю, что на это ответить. Напиши, как мне отвечать, и я запомню.";

const TEACH_ACK: &str = "Запомнил! Теперь буду отвечать так.";

/// Maximum length of the slug part of a learned intent id.
const MAX_SLUG_CHARS: usize = 48;

/// Derives a stable learned-intent id from normalized text.
pub fn learned_intent_id(normalized: &str) -> String {
    let slug: String = normalized
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .take(MAX_SLUG_CHARS)
        .collect();
    format!("learned_{slug}")
}

/// Stage 2: a pending teach captures this turn's text verbatim.
pub fn capture_taught_reply(
    input: &TurnInput,
    session: &mut Session,
    ctx: &EngineContext,
) -> Option<String> {
    let pending = session.awaiting_teach.take()?;
    let taught = input.raw.trim();
    if taught.is_empty() {
        // Nothing to learn from an empty turn; drop the expectation.
        return Some(TEACH_PLACEHOLDER.to_string());
    }

    session
        .custom_answers
        .insert(pending.clone(), taught.to_string());

    let intent_id = learned_intent_id(&ctx.normalizer.normalize(&pending));
    if !ctx.set_learned_response(&intent_id, taught) {
        tracing::debug!(intent_id, "taught reply for unknown learned intent");
    }
    Some(TEACH_ACK.to_string())
}

/// Stage 3 (after the reset command): exact-match taught answers.
pub fn custom_answer_lookup(
    input: &TurnInput,
    session: &mut Session,
    _ctx: &EngineContext,
) -> Option<String> {
    session.custom_answers.get(&input.raw).cloned()
}

/// Stage 15: the end of the cascade. Registers a stub intent for the
/// unmatched utterance, persists it, and asks the user to teach a reply.
pub fn learn_unknown(
    input: &TurnInput,
    session: &mut Session,
    ctx: &EngineContext,
) -> Option<String> {
    let intent_id = learned_intent_id(&input.normalized);
    if ctx.lookup_intent(&intent_id).is_none() {
        ctx.register_learned(Intent::learned(
            &intent_id,
            &input.normalized,
            TEACH_PLACEHOLDER,
        ));
    }
    session.awaiting_teach = Some(input.raw.clone());
    Some(TEACH_PLACEHOLDER.to_string())
}
