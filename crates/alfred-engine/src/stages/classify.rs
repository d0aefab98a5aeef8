//! Intent classification stage.

use super::recommend::{genre_question, media_category, recommend_titles};
use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::session::Session;

/// Direct classification, then the fuzzy rescue. Only intents that carry
/// at least one response count; resolver errors mean "no intent".
fn resolve(ctx: &EngineContext, text: &str) -> Option<String> {
    match ctx.resolver.classify(text) {
        Ok(id) if ctx.has_responses(&id) => return Some(id),
        Ok(_) => {}
        Err(err) => tracing::debug!(%err, "direct classification failed"),
    }
    match ctx.resolver.classify_fuzzy(text, ctx.config.fuzzy_threshold) {
        Ok(id) if ctx.has_responses(&id) => Some(id),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(%err, "fuzzy classification failed");
            None
        }
    }
}

/// Stage 13: classification with response selection and follow-ups.
///
/// Media-recommendation intents recommend directly when the genre is
/// already remembered, otherwise ask for it and set `awaiting_genre`.
/// Other intents pick a response avoiding the immediately previous reply,
/// and append at most one not-yet-used follow-up, never on two turns in a
/// row (`asked_followup`). The used-follow-up set resets when the intent
/// changes.
pub fn classify_intent(input: &TurnInput, session: &mut Session, ctx: &EngineContext) -> Option<String> {
    let intent_id = resolve(ctx, &input.normalized)?;

    if let Some(category) = media_category(&intent_id) {
        session.last_intent = Some(intent_id);
        if let Some(genre) = session.preferences.get(&format!("{category}_genre")).cloned() {
            return recommend_titles(ctx, session, category, &genre);
        }
        session.awaiting_genre = Some(category.to_string());
        return Some(genre_question(ctx, category));
    }

    let intent = ctx.lookup_intent(&intent_id)?;
    if session.last_intent.as_deref() != Some(intent_id.as_str()) {
        session.asked_questions.clear();
        session.asked_followup = false;
    }

    let fresh: Vec<&String> = intent
        .responses
        .iter()
        .filter(|r| Some(r.as_str()) != session.last_bot_reply.as_deref())
        .collect();
    let base = if fresh.is_empty() {
        ctx.choose(&intent.responses)?.clone()
    } else {
        (*ctx.choose(&fresh)?).clone()
    };

    let mut reply = base.clone();
    if session.asked_followup {
        session.asked_followup = false;
    } else if let Some(followup) = intent
        .followups
        .iter()
        .find(|f| !session.asked_questions.contains(f))
    {
        reply.push(' ');
        reply.push_str(followup);
        session.asked_questions.insert(followup.as_str());
        session.asked_followup = true;
    }

    session.last_intent = Some(intent_id);
    session.last_bot_reply = Some(base);
    Some(reply)
}
