//! Computer opponent strategies.
//!
//! Each [`Difficulty`] maps to one [`Strategy`]. Strategies are pure over the
//! board they are given; randomness comes in through the caller's RNG so
//! tests can seed it.

mod heuristic;
mod minimax;
mod random;

pub use heuristic::HeuristicStrategy;
pub use minimax::{LOSS_SCORE, MinimaxStrategy, WIN_SCORE};
pub use random::RandomStrategy;

use super::config::Difficulty;
use super::{Board, Player, Position};
use rand::RngCore;
use tracing::instrument;

/// Policy that picks the computer's next move.
pub trait Strategy: std::fmt::Debug + Send + Sync {
    /// Chooses a position for `computer` against `human`.
    ///
    /// Returns `None` only when the board has no empty square.
    fn choose_move(
        &self,
        board: &Board,
        computer: Player,
        human: Player,
        rng: &mut dyn RngCore,
    ) -> Option<Position>;

    /// Difficulty tier this strategy implements.
    fn difficulty(&self) -> Difficulty;
}

/// Returns the strategy for a difficulty tier.
#[instrument]
pub fn strategy_for(difficulty: Difficulty) -> Box<dyn Strategy> {
    match difficulty {
        Difficulty::Easy => Box::new(RandomStrategy),
        Difficulty::Medium => Box::new(HeuristicStrategy),
        Difficulty::Hard => Box::new(MinimaxStrategy),
    }
}
