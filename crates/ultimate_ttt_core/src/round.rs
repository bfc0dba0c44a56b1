//! Round engine: the grid, its move history, and the round lifecycle.

use super::action::{Move, MoveError};
use super::contracts::{Contract, MoveContract, assert_invariants};
use super::phases::{Outcome, RoundStatus};
use super::rules::{self, Line};
use super::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// State of one round, from an empty grid to a win or draw.
///
/// The player to move is never stored. It is derived from the history
/// length and the round's starter, so undo cannot leave it out of sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub(crate) board: Board,
    pub(crate) history: Vec<Position>,
    starter: Player,
    status: RoundStatus,
    winning_line: Option<Line>,
}

impl RoundState {
    /// Creates an empty round opened by `starter`.
    #[instrument]
    pub fn new(starter: Player) -> Self {
        Self {
            board: Board::new(),
            history: Vec::new(),
            starter,
            status: RoundStatus::InProgress,
            winning_line: None,
        }
    }

    /// Replays alternating moves from an empty round opened by `starter`.
    #[instrument]
    pub fn replay(starter: Player, moves: &[Position]) -> Result<Self, MoveError> {
        let mut round = Self::new(starter);
        for pos in moves {
            round.apply_move(Move::new(round.to_move(), *pos))?;
        }
        Ok(round)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the move history, oldest first.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Returns the player who opened this round.
    pub fn starter(&self) -> Player {
        self.starter
    }

    /// Returns the round status.
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Returns the completed line once the round is won.
    pub fn winning_line(&self) -> Option<Line> {
        self.winning_line
    }

    /// Returns true once the round is decided.
    pub fn is_over(&self) -> bool {
        !self.status.is_in_progress()
    }

    /// Returns the player to move.
    pub fn to_move(&self) -> Player {
        if self.history.len() % 2 == 0 {
            self.starter
        } else {
            self.starter.opponent()
        }
    }

    /// Empty positions in ascending order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.board.empty_positions()
    }

    /// Applies a move and advances the round.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] without touching the round if the round is over,
    /// the mover is not the player to move, or the square is occupied.
    #[instrument(skip(self), fields(to_move = %self.to_move()))]
    pub fn apply_move(&mut self, action: Move) -> Result<RoundStatus, MoveError> {
        MoveContract::pre(self, &action)?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        self.place(action.position, action.player)?;

        let evaluation = rules::evaluate(&self.board);
        if let Some(winner) = evaluation.winner() {
            self.status = RoundStatus::Over(Outcome::Winner(winner));
            self.winning_line = evaluation.line();
        } else if rules::is_full(&self.board) {
            self.status = RoundStatus::Over(Outcome::Draw);
        }

        #[cfg(debug_assertions)]
        MoveContract::post(&before, self)?;

        debug!(%action, status = ?self.status, "Move applied");
        Ok(self.status)
    }

    /// Takes back up to `steps` of the most recent moves.
    ///
    /// Does nothing once the round is over or before any move. Returns the
    /// number of moves removed.
    #[instrument(skip(self), fields(history_len = self.history.len()))]
    pub fn undo(&mut self, steps: usize) -> usize {
        if self.is_over() || self.history.is_empty() {
            debug!("Nothing to undo");
            return 0;
        }

        let mut removed = 0;
        for _ in 0..steps {
            let Some(&last) = self.history.last() else {
                break;
            };
            self.remove(last);
            removed += 1;
        }

        assert_invariants(self);
        debug!(removed, to_move = %self.to_move(), "Moves undone");
        removed
    }

    /// Clears the grid and history for a new round opened by `starter`.
    #[instrument(skip(self))]
    pub fn reset(&mut self, starter: Player) {
        *self = Self::new(starter);
    }

    /// Marks `pos` for `player` and records it in the history.
    fn place(&mut self, pos: Position, player: Player) -> Result<(), MoveError> {
        if !self.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }
        if rules::check_winner(&self.board).is_some() || rules::is_full(&self.board) {
            return Err(MoveError::RoundOver);
        }
        self.board.set(pos, Square::Occupied(player));
        self.history.push(pos);
        Ok(())
    }

    /// Clears the most recent move.
    fn remove(&mut self, pos: Position) {
        debug_assert_eq!(self.history.last(), Some(&pos), "only the last move can be removed");
        self.history.pop();
        self.board.set(pos, Square::Empty);
    }
}
