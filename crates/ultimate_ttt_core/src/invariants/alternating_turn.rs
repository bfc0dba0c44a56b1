//! Alternating turn invariant: marks alternate starting with the round's starter.

use super::super::{RoundState, Square};
use super::Invariant;

/// Invariant: Players alternate turns.
///
/// The square played at history entry `i` holds the starter's mark when `i`
/// is even and the other mark when `i` is odd.
pub struct AlternatingTurnInvariant;

impl Invariant<RoundState> for AlternatingTurnInvariant {
    fn holds(round: &RoundState) -> bool {
        let starter = round.starter();

        round.history().iter().enumerate().all(|(i, pos)| {
            let expected = if i % 2 == 0 { starter } else { starter.opponent() };
            round.board().get(*pos) == Square::Occupied(expected)
        })
    }

    fn description() -> &'static str {
        "Players alternate turns starting with the round starter"
    }
}
