//! Medium tier: win, block, center, corner, then random.

use super::{RandomStrategy, Strategy};
use crate::config::Difficulty;
use crate::rules::check_winner;
use crate::{Board, Player, Position};
use rand::RngCore;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Rule-of-thumb opponent. The first rule that yields a square wins:
///
/// 1. complete the computer's own line
/// 2. block the human's line
/// 3. take the center
/// 4. take a random free corner
/// 5. take any random free square
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

/// First empty square (ascending) that completes a line for `player`.
fn completing_move(board: &Board, player: Player) -> Option<Position> {
    board
        .empty_positions()
        .find(|pos| check_winner(&board.with(*pos, player)) == Some(player))
}

impl Strategy for HeuristicStrategy {
    #[instrument(skip(self, board, rng))]
    fn choose_move(
        &self,
        board: &Board,
        computer: Player,
        human: Player,
        rng: &mut dyn RngCore,
    ) -> Option<Position> {
        if let Some(pos) = completing_move(board, computer) {
            debug!(%pos, "Winning move");
            return Some(pos);
        }
        if let Some(pos) = completing_move(board, human) {
            debug!(%pos, "Blocking move");
            return Some(pos);
        }
        if board.is_empty(Position::Center) {
            return Some(Position::Center);
        }

        let corners: Vec<Position> = Position::CORNERS
            .into_iter()
            .filter(|pos| board.is_empty(*pos))
            .collect();
        if let Some(pos) = corners.choose(rng) {
            debug!(%pos, "Corner move");
            return Some(*pos);
        }

        RandomStrategy.choose_move(board, computer, human, rng)
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Medium
    }
}
