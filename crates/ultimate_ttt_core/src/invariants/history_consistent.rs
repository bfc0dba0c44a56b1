//! History consistency invariant: history length matches occupied squares.

use super::super::RoundState;
use super::Invariant;

/// Invariant: History length equals number of occupied squares.
///
/// Every move in history corresponds to exactly one occupied square.
pub struct HistoryConsistentInvariant;

impl Invariant<RoundState> for HistoryConsistentInvariant {
    fn holds(round: &RoundState) -> bool {
        round.history().len() == round.board().occupied_count()
    }

    fn description() -> &'static str {
        "History length matches number of occupied squares"
    }
}
