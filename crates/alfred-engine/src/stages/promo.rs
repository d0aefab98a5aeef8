//! Seasonal and keyword promotional triggers.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::config::EngineConfig;
use alfred_core::session::Session;
use chrono::{DateTime, Utc};

/// The shared ad cooldown: enough messages since the last offer AND enough
/// elapsed time. Both must hold before any offer may fire.
pub(crate) fn cooldown_ok(session: &Session, now: DateTime<Utc>, config: &EngineConfig) -> bool {
    if session.messages_since_ad < config.ad_cooldown_messages {
        return false;
    }
    match session.last_ad_at {
        Some(last) => {
            let elapsed = now.signed_duration_since(last);
            elapsed.num_hours() >= config.ad_cooldown_hours
        }
        None => true,
    }
}

/// Marks an offer as fired, resetting both cooldown counters.
pub(crate) fn mark_offer(session: &mut Session, now: DateTime<Utc>) {
    session.messages_since_ad = 0;
    session.last_ad_at = Some(now);
}

/// Stage 6: date-keyed and keyword-keyed offers behind the cooldown.
pub fn promo_triggers(input: &TurnInput, session: &mut Session, ctx: &EngineContext) -> Option<String> {
    if !cooldown_ok(session, input.now, &ctx.config) {
        return None;
    }
    let offer = ctx
        .promos
        .seasonal_offer(input.now)
        .or_else(|| ctx.promos.keyword_offer(&input.raw))?;
    mark_offer(session, input.now);
    tracing::debug!(user_id = %session.user_id, "promotional offer fired");
    Some(offer.to_string())
}
