//! Easy tier: uniformly random empty square.

use super::Strategy;
use crate::config::Difficulty;
use crate::{Board, Player, Position};
use rand::RngCore;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Picks any empty square with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    #[instrument(skip(self, board, rng))]
    fn choose_move(
        &self,
        board: &Board,
        _computer: Player,
        _human: Player,
        rng: &mut dyn RngCore,
    ) -> Option<Position> {
        let empties: Vec<Position> = board.empty_positions().collect();
        let choice = empties.choose(rng).copied();
        debug!(?choice, "Random move");
        choice
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Easy
    }
}
