//! Win detection logic for tic-tac-toe.

use super::super::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Three positions forming a row, column, or diagonal.
pub type Line = [Position; 3];

/// Winning lines in scan order: rows, columns, then diagonals.
pub const WIN_LINES: [Line; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Result of scanning a board for three-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// A player completed a line.
    Win {
        /// The player holding the line.
        winner: Player,
        /// The first completed line in [`WIN_LINES`] order.
        line: Line,
    },
    /// No completed line.
    NoWinner,
}

impl Evaluation {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Evaluation::Win { winner, .. } => Some(*winner),
            Evaluation::NoWinner => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn line(&self) -> Option<Line> {
        match self {
            Evaluation::Win { line, .. } => Some(*line),
            Evaluation::NoWinner => None,
        }
    }
}

/// Scans the win lines in table order and reports the first complete one.
#[instrument]
pub fn evaluate(board: &Board) -> Evaluation {
    for line @ [a, b, c] in WIN_LINES {
        if let Square::Occupied(winner) = board.get(a)
            && board.get(b) == Square::Occupied(winner)
            && board.get(c) == Square::Occupied(winner)
        {
            return Evaluation::Win { winner, line };
        }
    }

    Evaluation::NoWinner
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player has three in a row,
/// `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Player> {
    evaluate(board).winner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(evaluate(&Board::new()), Evaluation::NoWinner);
    }

    #[test]
    fn test_winner_top_row() {
        // X X X / O O _ / _ _ _
        let board = Board::new()
            .with(Position::TopLeft, Player::X)
            .with(Position::TopCenter, Player::X)
            .with(Position::TopRight, Player::X)
            .with(Position::MiddleLeft, Player::O)
            .with(Position::Center, Player::O);
        let eval = evaluate(&board);
        assert_eq!(eval.winner(), Some(Player::X));
        assert_eq!(
            eval.line(),
            Some([Position::TopLeft, Position::TopCenter, Position::TopRight])
        );
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = Board::new()
            .with(Position::TopRight, Player::O)
            .with(Position::Center, Player::O)
            .with(Position::BottomLeft, Player::O);
        assert_eq!(check_winner(&board), Some(Player::O));
        assert_eq!(evaluate(&board).line(), Some(WIN_LINES[7]));
    }

    #[test]
    fn test_first_line_in_table_order_reported() {
        // X completes both the top row and the left column.
        let board = Board::new()
            .with(Position::TopLeft, Player::X)
            .with(Position::TopCenter, Player::X)
            .with(Position::TopRight, Player::X)
            .with(Position::MiddleLeft, Player::X)
            .with(Position::BottomLeft, Player::X);
        assert_eq!(evaluate(&board).line(), Some(WIN_LINES[0]));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = Board::new()
            .with(Position::TopLeft, Player::X)
            .with(Position::TopCenter, Player::X);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = Board::new()
            .with(Position::TopLeft, Player::X)
            .with(Position::TopCenter, Player::O)
            .with(Position::TopRight, Player::X);
        assert_eq!(check_winner(&board), None);
    }
}
