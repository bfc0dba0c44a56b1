//! Monotonic board invariant: squares never change once set.

use super::super::{Board, RoundState};
use super::Invariant;

/// Invariant: Board squares are monotonic (never overwritten).
///
/// Replaying the history onto an empty board must visit only empty squares
/// and reproduce the current board exactly.
pub struct MonotonicBoardInvariant;

impl Invariant<RoundState> for MonotonicBoardInvariant {
    fn holds(round: &RoundState) -> bool {
        let mut reconstructed = Board::new();
        let mut player = round.starter();

        for pos in round.history() {
            if !reconstructed.is_empty(*pos) {
                return false;
            }
            reconstructed = reconstructed.with(*pos, player);
            player = player.opponent();
        }

        reconstructed == *round.board()
    }

    fn description() -> &'static str {
        "Board squares are monotonic (never overwritten)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Position, Square};

    #[test]
    fn test_replayed_round_holds() {
        let round = RoundState::replay(
            Player::X,
            &[Position::Center, Position::TopLeft, Position::TopRight],
        )
        .expect("legal moves");
        assert!(MonotonicBoardInvariant::holds(&round));
    }

    #[test]
    fn test_duplicate_history_violates() {
        let mut round = RoundState::replay(Player::X, &[Position::Center]).expect("legal move");
        round.history.push(Position::Center);
        assert!(!MonotonicBoardInvariant::holds(&round));
    }

    #[test]
    fn test_stray_mark_violates() {
        let mut round = RoundState::new(Player::X);
        round.board.set(Position::BottomLeft, Square::Occupied(Player::X));
        assert!(!MonotonicBoardInvariant::holds(&round));
    }
}
