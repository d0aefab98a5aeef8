//! Mini-game stages: routing moves to an active game and launching one.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::game::TicTacToe;
use alfred_core::session::Session;

const LAUNCH_KEYWORDS: [&str; 3] = ["крестики-нолики", "крестики нолики", "сыграем в игру"];

/// Stage 1: an active game consumes every input until it finishes.
pub fn active_game(input: &TurnInput, session: &mut Session, _ctx: &EngineContext) -> Option<String> {
    let game = session.game.as_mut()?;
    let outcome = game.play_turn(&input.raw);
    if outcome.finished {
        session.game = None;
    }
    Some(outcome.reply)
}

/// Stage 10: the launch keyword starts a new game and shows the board.
pub fn game_launch(input: &TurnInput, session: &mut Session, _ctx: &EngineContext) -> Option<String> {
    let lower = input.raw.to_lowercase();
    if !LAUNCH_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return None;
    }
    let game = TicTacToe::new();
    let board = game.render();
    session.game = Some(game);
    Some(format!(
        "Сыграем! Ты ходишь первым крестиками.\n{board}\nТвой ход (формат A1..C3):"
    ))
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{demo_context, session, turn};
    use super::*;

    #[test]
    fn test_launch_creates_game_handle() {
        let ctx = demo_context(1);
        let mut s = session();
        let reply = game_launch(&turn("давай сыграем в крестики-нолики", &ctx), &mut s, &ctx).unwrap();
        assert!(s.game.is_some());
        assert!(reply.contains("1 2 3"));
    }

    #[test]
    fn test_no_launch_without_keyword() {
        let ctx = demo_context(1);
        let mut s = session();
        assert!(game_launch(&turn("привет", &ctx), &mut s, &ctx).is_none());
        assert!(s.game.is_none());
    }

    #[test]
    fn test_active_game_consumes_input() {
        let ctx = demo_context(1);
        let mut s = session();
        game_launch(&turn("крестики-нолики", &ctx), &mut s, &ctx);

        let reply = active_game(&turn("A1", &ctx), &mut s, &ctx).unwrap();
        assert!(reply.contains("Твой ход"));
        assert!(s.game.is_some(), "game continues after one move");
    }

    #[test]
    fn test_bad_move_keeps_game_alive() {
        let ctx = demo_context(1);
        let mut s = session();
        game_launch(&turn("крестики-нолики", &ctx), &mut s, &ctx);

        let reply = active_game(&turn("Z9", &ctx), &mut s, &ctx).unwrap();
        assert!(reply.contains("Неверный формат"));
        assert!(s.game.is_some());
    }

    #[test]
    fn test_finished_game_clears_handle() {
        let ctx = demo_context(1);
        let mut s = session();
        game_launch(&turn("крестики-нолики", &ctx), &mut s, &ctx);

        // Play until the game reports completion (optimal bot forces a
        // draw or win well within nine moves).
        let coords = ["A1", "A2", "B1", "C3", "C2", "B3", "C1", "B2", "A3"];
        let mut finished = false;
        for coord in coords {
            if s.game.is_none() {
                finished = true;
                break;
            }
            active_game(&turn(coord, &ctx), &mut s, &ctx);
        }
        assert!(finished || s.game.is_none());
    }
}
