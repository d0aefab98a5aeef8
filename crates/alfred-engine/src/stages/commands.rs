//! Explicit session commands.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::session::Session;

const RESET_REPLY: &str = "Хорошо, начнём с чистого листа. О чём поговорим?";

/// Stage 3: an explicit reset wipes the whole session.
pub fn reset_command(
    input: &TurnInput,
    session: &mut Session,
    _ctx: &EngineContext,
) -> Option<String> {
    let trimmed = input.raw.trim().to_lowercase();
    if trimmed != "/reset" && trimmed != "сброс" {
        return None;
    }
    tracing::info!(user_id = %session.user_id, "session reset");
    *session = Session::new(session.user_id.clone());
    Some(RESET_REPLY.to_string())
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{demo_context, session, turn};
    use super::*;

    #[test]
    fn test_reset_wipes_session_state() {
        let ctx = demo_context(1);
        let mut s = session();
        s.preferences
            .insert("movie_genre".to_string(), "комедия".to_string());
        s.awaiting_genre = Some("movie".to_string());
        s.push_turn("привет", "Привет!", 50);

        let reply = reset_command(&turn("сброс", &ctx), &mut s, &ctx).unwrap();
        assert!(reply.contains("чистого листа"));
        assert_eq!(s.user_id, "user-1");
        assert!(s.preferences.is_empty());
        assert!(s.awaiting_genre.is_none());
        assert!(s.history.is_empty());
    }

    #[test]
    fn test_slash_reset_also_works() {
        let ctx = demo_context(1);
        let mut s = session();
        assert!(reset_command(&turn("/reset", &ctx), &mut s, &ctx).is_some());
    }

    #[test]
    fn test_other_input_passes_through() {
        let ctx = demo_context(1);
        let mut s = session();
        assert!(reset_command(&turn("сбрось мне ссылку", &ctx), &mut s, &ctx).is_none());
    }
}
