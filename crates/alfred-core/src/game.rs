//! Embedded tic-tac-toe mini-game.
//!
//! A deterministic adversarial sub-system entered and exited as a session
//! sub-state. The player moves first with `X`; the bot answers with `O`
//! chosen by full-depth minimax, which at this board size is optimal: the
//! bot never loses as the second mover. The whole entity serializes with
//! the session so a game survives restarts.

use serde::{Deserialize, Serialize};

/// Contents of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Player,
    Bot,
}

/// Which side occupies or wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Bot,
}

/// Terminal-state classification of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    Won(Side),
    Draw,
}

/// Result of applying one player turn.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// User-facing reply (board render, error prompt, or verdict)
    pub reply: String,
    /// `true` once the game reached a terminal state
    pub finished: bool,
}

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A 3×3 tic-tac-toe board with an optimal bot opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicTacToe {
    board: [[Cell; 3]; 3],
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [[Cell::Empty; 3]; 3],
        }
    }

    /// Renders the board as a fixed text grid with row letters A-C and
    /// column digits 1-3.
    pub fn render(&self) -> String {
        let mut out = String::from("  1 2 3");
        for (i, row) in self.board.iter().enumerate() {
            out.push('\n');
            out.push((b'A' + i as u8) as char);
            for cell in row {
                out.push(' ');
                out.push(match cell {
                    Cell::Empty => '.',
                    Cell::Player => 'X',
                    Cell::Bot => 'O',
                });
            }
        }
        out
    }

    /// Classifies the current board.
    pub fn state(&self) -> GameState {
        if self.wins(Cell::Player) {
            return GameState::Won(Side::Player);
        }
        if self.wins(Cell::Bot) {
            return GameState::Won(Side::Bot);
        }
        if self.is_full() {
            return GameState::Draw;
        }
        GameState::InProgress
    }

    /// Applies one player turn: validate the coordinate, place the player
    /// mark, answer with the bot's minimax move, and report the result.
    ///
    /// Malformed coordinates and occupied cells leave the board unchanged
    /// and return a correction prompt with `finished: false`.
    pub fn play_turn(&mut self, coord: &str) -> MoveOutcome {
        let (row, col) = match parse_coord(coord) {
            Some(rc) => rc,
            None => {
                return MoveOutcome {
                    reply: "Неверный формат! Вводи букву A-C и цифру 1-3, например A1.".to_string(),
                    finished: false,
                }
            }
        };
        if self.board[row][col] != Cell::Empty {
            return MoveOutcome {
                reply: "Эта клетка уже занята, выбери другую.".to_string(),
                finished: false,
            };
        }

        self.board[row][col] = Cell::Player;
        if self.wins(Cell::Player) {
            return self.verdict("Поздравляю, ты выиграл!");
        }
        if self.is_full() {
            return self.verdict("Ничья!");
        }

        self.bot_move();
        if self.wins(Cell::Bot) {
            return self.verdict("Увы, бот выиграл.");
        }
        if self.is_full() {
            return self.verdict("Ничья!");
        }

        MoveOutcome {
            reply: format!("{}\nТвой ход (формат A1..C3):", self.render()),
            finished: false,
        }
    }

    fn verdict(&self, line: &str) -> MoveOutcome {
        MoveOutcome {
            reply: format!("{}\n{line}", self.render()),
            finished: true,
        }
    }

    fn wins(&self, mark: Cell) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&(r, c)| self.board[r][c] == mark))
    }

    fn is_full(&self) -> bool {
        self.board
            .iter()
            .all(|row| row.iter().all(|&cell| cell != Cell::Empty))
    }

    fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                if self.board[r][c] == Cell::Empty {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    fn bot_move(&mut self) {
        if let (_, Some((r, c))) = self.minimax(true) {
            self.board[r][c] = Cell::Bot;
        }
    }

    /// Full-depth minimax: bot win +1, player win -1, draw 0. No pruning;
    /// the search space is small enough for an exhaustive scan.
    fn minimax(&mut self, bot_turn: bool) -> (i32, Option<(usize, usize)>) {
        if self.wins(Cell::Bot) {
            return (1, None);
        }
        if self.wins(Cell::Player) {
            return (-1, None);
        }
        if self.is_full() {
            return (0, None);
        }

        let mut best_score = if bot_turn { i32::MIN } else { i32::MAX };
        let mut best_move = None;
        for (r, c) in self.empty_cells() {
            self.board[r][c] = if bot_turn { Cell::Bot } else { Cell::Player };
            let (score, _) = self.minimax(!bot_turn);
            self.board[r][c] = Cell::Empty;

            let better = if bot_turn {
                score > best_score
            } else {
                score < best_score
            };
            if better {
                best_score = score;
                best_move = Some((r, c));
            }
        }
        (best_score, best_move)
    }
}

/// Parses a coordinate like "A1" or "c3" (case-insensitive, surrounding
/// whitespace ignored) into zero-based (row, col).
fn parse_coord(coord: &str) -> Option<(usize, usize)> {
    let trimmed = coord.trim().to_uppercase();
    let mut chars = trimmed.chars();
    let row = match chars.next()? {
        r @ 'A'..='C' => (r as u8 - b'A') as usize,
        _ => return None,
    };
    let col = match chars.next()? {
        c @ '1'..='3' => (c as u8 - b'1') as usize,
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_coordinates() {
        let mut game = TicTacToe::new();
        let before = game.clone();
        for bad in ["", "D1", "A4", "A12", "hello"] {
            let outcome = game.play_turn(bad);
            assert!(!outcome.finished);
            assert!(outcome.reply.contains("Неверный формат"), "coord {bad:?}");
            assert_eq!(game, before, "board must not change on {bad:?}");
        }
    }

    #[test]
    fn test_rejects_occupied_cell() {
        let mut game = TicTacToe::new();
        game.play_turn("B2");
        let before = game.clone();
        let outcome = game.play_turn("B2");
        assert!(outcome.reply.contains("занята"));
        assert_eq!(game, before);
    }

    #[test]
    fn test_bot_answers_every_legal_move() {
        let mut game = TicTacToe::new();
        let outcome = game.play_turn("A1");
        assert!(!outcome.finished);
        // One player mark, one bot mark
        let marks: Vec<Cell> = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .map(|(r, c)| game.board[r][c])
            .filter(|&cell| cell != Cell::Empty)
            .collect();
        assert_eq!(marks.len(), 2);
    }

    #[test]
    fn test_bot_blocks_immediate_win() {
        let mut game = TicTacToe::new();
        // Player takes A1; optimal bot answers with the center.
        game.play_turn("A1");
        assert_eq!(game.board[1][1], Cell::Bot);
        // Player threatens A1-A2-A3; bot must take A3.
        game.play_turn("A2");
        assert_eq!(game.board[0][2], Cell::Bot);
    }

    #[test]
    fn test_bot_never_loses() {
        // Exhaustively play every legal player strategy against the bot.
        fn explore(game: &TicTacToe, depth: usize) {
            for (r, c) in game.empty_cells() {
                let mut next = game.clone();
                let coord = format!("{}{}", (b'A' + r as u8) as char, c + 1);
                let outcome = next.play_turn(&coord);
                if outcome.finished {
                    assert!(
                        !matches!(next.state(), GameState::Won(Side::Player)),
                        "player won with moves ending at {coord} (depth {depth})"
                    );
                } else {
                    explore(&next, depth + 1);
                }
            }
        }
        explore(&TicTacToe::new(), 0);
    }

    #[test]
    fn test_render_shape() {
        let game = TicTacToe::new();
        let render = game.render();
        assert_eq!(render.lines().count(), 4);
        assert!(render.starts_with("  1 2 3"));
        assert!(render.contains("A . . ."));
    }

    #[test]
    fn test_serializes_with_session_state() {
        let mut game = TicTacToe::new();
        game.play_turn("A1");
        let json = serde_json::to_string(&game).unwrap();
        let back: TicTacToe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, game);
    }
}
