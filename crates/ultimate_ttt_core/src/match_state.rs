//! Match scoring across rounds.

use super::config::BestOf;
use super::phases::Outcome;
use super::Player;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Round results counted by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Rounds won by X.
    pub x_wins: u32,
    /// Rounds won by O.
    pub o_wins: u32,
    /// Drawn rounds.
    pub draws: u32,
}

impl Tally {
    /// Counts one round result.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Winner(Player::X) => self.x_wins += 1,
            Outcome::Winner(Player::O) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Round wins for `player`.
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x_wins,
            Player::O => self.o_wins,
        }
    }
}

/// Scores for the match in progress.
///
/// `tally` decides the match; `totals` is the scoreboard shown beside it.
/// Both are cleared whenever a new match begins. Draws never end a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    tally: Tally,
    totals: Tally,
    best_of: BestOf,
    round_starter: Player,
}

impl MatchState {
    /// Creates an empty match.
    #[instrument]
    pub fn new(best_of: BestOf) -> Self {
        Self {
            tally: Tally::default(),
            totals: Tally::default(),
            best_of,
            round_starter: Player::X,
        }
    }

    /// Rebuilds a match from saved counters.
    pub fn from_parts(tally: Tally, totals: Tally, best_of: BestOf, round_starter: Player) -> Self {
        Self {
            tally,
            totals,
            best_of,
            round_starter,
        }
    }

    /// Counts the result of a finished round.
    #[instrument(skip(self))]
    pub fn record_round_result(&mut self, outcome: Outcome) {
        self.tally.record(outcome);
        self.totals.record(outcome);
        info!(
            x_wins = self.tally.x_wins,
            o_wins = self.tally.o_wins,
            draws = self.tally.draws,
            match_over = self.is_match_over(),
            "Round recorded"
        );
    }

    /// True once either side reaches the target win count.
    pub fn is_match_over(&self) -> bool {
        self.match_winner().is_some()
    }

    /// The side that reached the target, if any.
    pub fn match_winner(&self) -> Option<Player> {
        let target = self.target_wins();
        [Player::X, Player::O]
            .into_iter()
            .find(|player| self.tally.wins(*player) >= target)
    }

    /// Zeroes all counters and gives the next round to X.
    #[instrument(skip(self))]
    pub fn start_new_match(&mut self) {
        self.tally = Tally::default();
        self.totals = Tally::default();
        self.round_starter = Player::X;
        info!(best_of = %self.best_of, "New match");
    }

    /// Changes the match length.
    #[instrument(skip(self))]
    pub fn set_best_of(&mut self, best_of: BestOf) {
        self.best_of = best_of;
    }

    /// Round wins needed to take the match.
    pub fn target_wins(&self) -> u32 {
        self.best_of.target_wins()
    }

    /// Match length.
    pub fn best_of(&self) -> BestOf {
        self.best_of
    }

    /// Counters that decide the match.
    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Scoreboard totals.
    pub fn totals(&self) -> &Tally {
        &self.totals
    }

    /// Player who opens the next round.
    pub fn round_starter(&self) -> Player {
        self.round_starter
    }

    pub(crate) fn set_round_starter(&mut self, starter: Player) {
        self.round_starter = starter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_of_three_needs_two_wins() {
        let mut score = MatchState::new(BestOf::Three);
        assert_eq!(score.target_wins(), 2);

        score.record_round_result(Outcome::Winner(Player::X));
        assert!(!score.is_match_over());

        score.record_round_result(Outcome::Winner(Player::X));
        assert!(score.is_match_over());
        assert_eq!(score.match_winner(), Some(Player::X));
    }

    #[test]
    fn test_draws_never_end_match() {
        let mut score = MatchState::new(BestOf::One);
        for _ in 0..10 {
            score.record_round_result(Outcome::Draw);
        }
        assert!(!score.is_match_over());
        assert_eq!(score.tally().draws, 10);
    }

    #[test]
    fn test_start_new_match_zeroes() {
        let mut score = MatchState::new(BestOf::Five);
        score.record_round_result(Outcome::Winner(Player::O));
        score.record_round_result(Outcome::Draw);
        score.set_round_starter(Player::O);

        score.start_new_match();
        assert_eq!(*score.tally(), Tally::default());
        assert_eq!(*score.totals(), Tally::default());
        assert_eq!(score.round_starter(), Player::X);
    }

    #[test]
    fn test_set_best_of_changes_target() {
        let mut score = MatchState::new(BestOf::Three);
        score.set_best_of(BestOf::One);
        score.record_round_result(Outcome::Winner(Player::O));
        assert!(score.is_match_over());
    }
}
