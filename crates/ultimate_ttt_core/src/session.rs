//! Game session: the single owner of configuration, round, and match state.

use super::action::{Move, MoveError};
use super::config::{BestOf, Configuration, Difficulty, Mode};
use super::match_state::MatchState;
use super::opponent::strategy_for;
use super::phases::RoundStatus;
use super::round::RoundState;
use super::rules::Line;
use super::saved::{Preferences, SavedState};
use super::{Player, Position};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// What the presentation layer needs after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTransition {
    /// Round phase after the transition.
    pub status: RoundStatus,
    /// Winner, once the round is won.
    pub winner: Option<Player>,
    /// Line to highlight, once the round is won.
    pub line: Option<Line>,
    /// Player to move next (meaningful while in progress).
    pub to_move: Player,
    /// True when the round's result decided the match.
    pub match_over: bool,
}

/// A running game: configuration, the current round, and match scores.
///
/// Every change goes through this type's methods; presentation code reads
/// the results and never edits the parts directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    config: Configuration,
    round: RoundState,
    score: MatchState,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl GameSession {
    /// Starts a fresh match with `config`.
    #[instrument]
    pub fn new(mut config: Configuration) -> Self {
        config.normalize_names();
        let score = MatchState::new(config.best_of);
        let round = RoundState::new(score.round_starter());
        Self {
            config,
            round,
            score,
        }
    }

    /// Resumes from a saved blob with a fresh round.
    ///
    /// A match that was already decided when saved resumes as a new match.
    #[instrument(skip(saved))]
    pub fn restore(saved: &SavedState) -> Self {
        let mut config = saved.configuration();
        config.normalize_names();
        let mut score = MatchState::from_parts(
            saved.tally(),
            saved.totals(),
            config.best_of,
            saved.round_starter,
        );
        if score.is_match_over() {
            info!(
                winner = ?score.match_winner(),
                "Saved match already decided, starting a new one"
            );
            score.start_new_match();
        }
        let round = RoundState::new(score.round_starter());
        info!(mode = %config.mode, difficulty = %config.difficulty, "Session restored");
        Self {
            config,
            round,
            score,
        }
    }

    /// Captures the session and `prefs` as a saved blob.
    pub fn snapshot(&self, prefs: Preferences) -> SavedState {
        let tally = self.score.tally();
        let totals = self.score.totals();
        SavedState {
            mode: self.config.mode,
            difficulty: self.config.difficulty,
            best_of: self.config.best_of,
            match_x: tally.x_wins,
            match_o: tally.o_wins,
            draws: tally.draws,
            score_x: totals.x_wins,
            score_o: totals.o_wins,
            score_d: totals.draws,
            player_x_name: self.config.player_x_name.clone(),
            player_o_name: self.config.player_o_name.clone(),
            sound_on: prefs.sound_on,
            theme_light: prefs.theme_light,
            round_starter: self.score.round_starter(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Current round.
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Match scores.
    pub fn score(&self) -> &MatchState {
        &self.score
    }

    /// Player to move in the current round.
    pub fn to_move(&self) -> Player {
        self.round.to_move()
    }

    /// True when the computer should move next.
    pub fn is_computer_turn(&self) -> bool {
        !self.round.is_over() && self.config.mode.computer_mark() == Some(self.round.to_move())
    }

    /// True once either side has reached the target win count.
    pub fn is_match_over(&self) -> bool {
        self.score.is_match_over()
    }

    /// Summary of the current round.
    pub fn transition(&self) -> RoundTransition {
        RoundTransition {
            status: self.round.status(),
            winner: self.round.status().outcome().and_then(|o| o.winner()),
            line: self.round.winning_line(),
            to_move: self.round.to_move(),
            match_over: self.score.is_match_over(),
        }
    }

    /// Plays `pos` for the player to move.
    ///
    /// A move that ends the round is counted in the match score.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] (leaving the session unchanged) when the round
    /// is over or the square is taken.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, pos: Position) -> Result<RoundTransition, MoveError> {
        let player = self.round.to_move();
        let status = self.round.apply_move(Move::new(player, pos))?;

        if let RoundStatus::Over(outcome) = status {
            info!(%outcome, "Round over");
            self.score.record_round_result(outcome);
        }

        Ok(self.transition())
    }

    /// Plays the square at `index` (0..9, row-major).
    ///
    /// # Panics
    ///
    /// Panics when `index` is not a square on the board.
    #[instrument(skip(self))]
    pub fn apply_index(&mut self, index: usize) -> Result<RoundTransition, MoveError> {
        let Some(pos) = Position::from_index(index) else {
            panic!("square index {index} is outside 0..9");
        };
        self.apply_move(pos)
    }

    /// Takes back the last move. Against the computer, keeps taking back
    /// moves until the human is to move again.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> RoundTransition {
        let mut removed = self.round.undo(1);
        if self.config.mode == Mode::PlayerVsComputer {
            while removed > 0 && self.is_computer_turn() && !self.round.history().is_empty() {
                removed = self.round.undo(1);
            }
        }
        self.transition()
    }

    /// Clears the board for another round of the same match.
    ///
    /// With `keep_starter` false the opener alternates between players, or
    /// goes back to X against the computer.
    #[instrument(skip(self))]
    pub fn reset_round(&mut self, keep_starter: bool) -> RoundTransition {
        if !keep_starter {
            let starter = match self.config.mode {
                Mode::PlayerVsPlayer => self.score.round_starter().opponent(),
                Mode::PlayerVsComputer => Player::X,
            };
            self.score.set_round_starter(starter);
        }
        self.round.reset(self.score.round_starter());
        debug!(starter = %self.round.starter(), "Round reset");
        self.transition()
    }

    /// Picks the computer's move. `None` unless it is the computer's turn.
    #[instrument(skip(self, rng))]
    pub fn choose_computer_move(&self, rng: &mut dyn RngCore) -> Option<Position> {
        if !self.is_computer_turn() {
            return None;
        }
        let computer = self.round.to_move();
        strategy_for(self.config.difficulty).choose_move(
            self.round.board(),
            computer,
            computer.opponent(),
            rng,
        )
    }

    /// Chooses and plays the computer's move.
    ///
    /// Returns `Ok(None)` when it is not the computer's turn.
    #[instrument(skip(self, rng))]
    pub fn play_computer_move(
        &mut self,
        rng: &mut dyn RngCore,
    ) -> Result<Option<RoundTransition>, MoveError> {
        match self.choose_computer_move(rng) {
            Some(pos) => self.apply_move(pos).map(Some),
            None => Ok(None),
        }
    }

    /// Zeroes the scores and opens a fresh round with X.
    #[instrument(skip(self))]
    pub fn start_new_match(&mut self) -> RoundTransition {
        self.score.start_new_match();
        self.round.reset(self.score.round_starter());
        self.transition()
    }

    /// Moves on after a finished round: a new match once the match is
    /// decided, otherwise the next round with the opener alternating.
    #[instrument(skip(self))]
    pub fn next_round(&mut self) -> RoundTransition {
        if self.score.is_match_over() {
            self.start_new_match()
        } else {
            self.reset_round(false)
        }
    }

    /// Changes the mode and starts a new match.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: Mode) -> RoundTransition {
        self.config.mode = mode;
        self.config.normalize_names();
        self.start_new_match()
    }

    /// Changes the difficulty and starts a new match.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> RoundTransition {
        self.config.difficulty = difficulty;
        self.start_new_match()
    }

    /// Changes the match length and starts a new match.
    #[instrument(skip(self))]
    pub fn set_best_of(&mut self, best_of: BestOf) -> RoundTransition {
        self.config.best_of = best_of;
        self.score.set_best_of(best_of);
        self.start_new_match()
    }

    /// Renames the players without touching the match.
    #[instrument(skip(self))]
    pub fn set_player_names(&mut self, x_name: &str, o_name: &str) {
        self.config.player_x_name = x_name.to_string();
        self.config.player_o_name = o_name.to_string();
        self.config.normalize_names();
    }

    /// Replaces the whole configuration and starts a new match.
    #[instrument(skip(self))]
    pub fn configure(&mut self, config: Configuration) -> RoundTransition {
        self.config = config;
        self.config.normalize_names();
        self.score.set_best_of(self.config.best_of);
        self.start_new_match()
    }
}
