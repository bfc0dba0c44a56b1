//! Round lifecycle phases.

use serde::{Deserialize, Serialize};

/// Outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won the round.
    Winner(super::Player),
    /// Round ended in a draw.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<super::Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the round was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Moves are being accepted.
    #[default]
    InProgress,
    /// The round is decided; only reset or next round leave this phase.
    Over(Outcome),
}

impl RoundStatus {
    /// Returns the outcome once the round is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            RoundStatus::InProgress => None,
            RoundStatus::Over(outcome) => Some(*outcome),
        }
    }

    /// Returns true while moves are accepted.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, RoundStatus::InProgress)
    }
}
