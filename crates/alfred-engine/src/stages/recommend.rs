//! Media recommendation stages.
//!
//! `pending_genre` resolves a genre answer into titles once the engine has
//! asked for one; `repeat_request` serves «ещё»/«повтори» for repeatable
//! intents. The classification stage reuses the helpers here when a media
//! intent fires directly.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::catalog::clean_genre_answer;
use alfred_core::session::Session;

/// Intents whose responses make sense to serve again on «ещё».
const REPEATABLE_INTENTS: [&str; 2] = ["joke", "fact"];

const REPEAT_WORDS: [&str; 3] = ["ещё", "еще", "повтори"];

/// Maps a media-recommendation intent id to its catalog category.
pub(crate) fn media_category(intent_id: &str) -> Option<&'static str> {
    match intent_id {
        "recommend_movie" => Some("movie"),
        "recommend_music" => Some("music"),
        "recommend_game" => Some("game"),
        "recommend_series" => Some("series"),
        _ => None,
    }
}

/// The genre question for a category, listing what the catalog knows.
pub(crate) fn genre_question(ctx: &EngineContext, category: &str) -> String {
    match ctx.recommendations.genre_listing(category) {
        Some(listing) => format!("Какой жанр тебе интересен? Доступные жанры: {listing}."),
        None => "Какой жанр тебе интересен?".to_string(),
    }
}

/// Samples titles for (category, genre), records bookkeeping, and builds
/// the reply. `None` when the catalog has no such pair.
pub(crate) fn recommend_titles(
    ctx: &EngineContext,
    session: &mut Session,
    category: &str,
    genre: &str,
) -> Option<String> {
    let last = session.last_recommendation.clone();
    let picks = ctx.with_rng(|rng| {
        ctx.recommendations
            .sample_titles(category, genre, last.as_deref(), rng)
            .map(|picks| picks.iter().map(|t| t.to_string()).collect::<Vec<_>>())
    })?;
    session.last_recommendation = picks.first().cloned();
    Some(format!(
        "Вот что я могу порекомендовать в жанре «{genre}»: {}",
        picks.join("; ")
    ))
}

/// Stage 5: a pending genre question consumes this turn's answer.
pub fn pending_genre(input: &TurnInput, session: &mut Session, ctx: &EngineContext) -> Option<String> {
    let category = session.awaiting_genre.take()?;
    match ctx.recommendations.resolve_genre(&category, &input.raw) {
        Some(genre) => {
            let genre = genre.to_string();
            session
                .preferences
                .insert(format!("{category}_genre"), genre.clone());
            session.last_intent = Some(format!("recommend_{category}"));
            recommend_titles(ctx, session, &category, &genre)
        }
        None => {
            let cleaned = clean_genre_answer(&input.raw);
            let listing = ctx
                .recommendations
                .genre_listing(&category)
                .unwrap_or_default();
            Some(format!("Не распознал жанр «{cleaned}». Доступные: {listing}."))
        }
    }
}

/// Stage 9: «ещё»/«повтори» re-serves the last repeatable intent with a
/// fresh item.
pub fn repeat_request(input: &TurnInput, session: &mut Session, ctx: &EngineContext) -> Option<String> {
    let lower = input.raw.to_lowercase();
    if !REPEAT_WORDS
        .iter()
        .any(|word| lower.split_whitespace().any(|token| token.trim_matches(|c: char| !c.is_alphanumeric()) == *word))
    {
        return None;
    }
    let intent_id = session.last_intent.clone()?;

    if let Some(category) = media_category(&intent_id) {
        let genre = session.preferences.get(&format!("{category}_genre"))?.clone();
        return recommend_titles(ctx, session, category, &genre);
    }

    if !REPEATABLE_INTENTS.contains(&intent_id.as_str()) {
        return None;
    }
    let intent = ctx.lookup_intent(&intent_id)?;
    let fresh: Vec<&String> = intent
        .responses
        .iter()
        .filter(|r| Some(r.as_str()) != session.last_bot_reply.as_deref())
        .collect();
    let reply = ctx.choose(&fresh).map(|r| r.to_string())?;
    session.last_bot_reply = Some(reply.clone());
    Some(reply)
}
