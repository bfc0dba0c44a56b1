//! Hard tier: exhaustive minimax over the remaining game tree.

use super::{RandomStrategy, Strategy};
use crate::config::Difficulty;
use crate::rules::{check_winner, is_full};
use crate::{Board, Player, Position};
use rand::RngCore;
use tracing::{debug, instrument};

/// Score of a finished line of play the computer wins.
pub const WIN_SCORE: i32 = 10;
/// Score of a finished line of play the human wins.
pub const LOSS_SCORE: i32 = -10;

/// Perfect-play opponent.
///
/// Searches the whole tree below the current board with terminal-only
/// scoring and no depth discount. Among equally scored moves it keeps the
/// lowest index. The 3x3 tree is small enough that no pruning is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxStrategy;

/// Best score reachable from `board` with `to_move` on turn, and the move
/// that reaches it.
#[derive(Debug, Clone, Copy)]
struct Scored {
    score: i32,
    position: Option<Position>,
}

fn minimax(board: Board, to_move: Player, computer: Player) -> Scored {
    if let Some(winner) = check_winner(&board) {
        let score = if winner == computer { WIN_SCORE } else { LOSS_SCORE };
        return Scored { score, position: None };
    }
    if is_full(&board) {
        return Scored { score: 0, position: None };
    }

    let maximizing = to_move == computer;
    let mut best = Scored {
        score: if maximizing { i32::MIN } else { i32::MAX },
        position: None,
    };

    for pos in board.empty_positions() {
        let child = minimax(board.with(pos, to_move), to_move.opponent(), computer);
        let better = if maximizing {
            child.score > best.score
        } else {
            child.score < best.score
        };
        if better {
            best = Scored {
                score: child.score,
                position: Some(pos),
            };
        }
    }

    best
}

impl MinimaxStrategy {
    /// Minimax value of `board` for `computer` when `to_move` is on turn.
    pub fn score(board: &Board, to_move: Player, computer: Player) -> i32 {
        minimax(*board, to_move, computer).score
    }
}

impl Strategy for MinimaxStrategy {
    #[instrument(skip(self, board, rng))]
    fn choose_move(
        &self,
        board: &Board,
        computer: Player,
        human: Player,
        rng: &mut dyn RngCore,
    ) -> Option<Position> {
        let best = minimax(*board, computer, computer);
        debug!(score = best.score, position = ?best.position, "Minimax move");
        best.position
            .or_else(|| RandomStrategy.choose_move(board, computer, human, rng))
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Hard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn choose(board: &Board) -> Option<Position> {
        let mut rng = StdRng::seed_from_u64(1);
        MinimaxStrategy.choose_move(board, Player::O, Player::X, &mut rng)
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        assert_eq!(MinimaxStrategy::score(&Board::new(), Player::X, Player::O), 0);
    }

    #[test]
    fn test_takes_immediate_win() {
        let board = Board::new()
            .with(Position::TopLeft, Player::X)
            .with(Position::TopCenter, Player::X)
            .with(Position::BottomLeft, Player::X)
            .with(Position::MiddleLeft, Player::O)
            .with(Position::Center, Player::O);
        assert_eq!(choose(&board), Some(Position::MiddleRight));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let board = Board::new()
            .with(Position::TopLeft, Player::X)
            .with(Position::TopCenter, Player::X)
            .with(Position::Center, Player::O);
        assert_eq!(choose(&board), Some(Position::TopRight));
    }

    #[test]
    fn test_answers_corner_with_center() {
        // Every reply but the center loses against a corner opening.
        let board = Board::new().with(Position::TopLeft, Player::X);
        assert_eq!(choose(&board), Some(Position::Center));
    }

    #[test]
    fn test_ties_keep_lowest_index() {
        // Against a center opening every corner draws and every edge loses;
        // the first corner in index order is chosen.
        let board = Board::new().with(Position::Center, Player::X);
        assert_eq!(choose(&board), Some(Position::TopLeft));
    }

    #[test]
    fn test_deterministic() {
        let board = Board::new()
            .with(Position::TopCenter, Player::X)
            .with(Position::Center, Player::O)
            .with(Position::BottomRight, Player::X);
        assert_eq!(choose(&board), choose(&board));
    }
}
