//! Contract-based validation for round moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P} action {Q}. Preconditions are always checked; postconditions run in
//! debug builds only.

use super::action::{Move, MoveError};
use super::invariants::{InvariantSet, RoundInvariants};
use super::round::RoundState;
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// Precondition: The round must still accept moves.
pub struct RoundInProgress;

impl RoundInProgress {
    /// Rejects moves once the round is decided.
    #[instrument(skip(round))]
    pub fn check(round: &RoundState) -> Result<(), MoveError> {
        if round.is_over() {
            Err(MoveError::RoundOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: The square at the move's position must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Rejects moves onto occupied squares.
    #[instrument(skip(round))]
    pub fn check(mov: &Move, round: &RoundState) -> Result<(), MoveError> {
        if !round.board().is_empty(mov.position) {
            Err(MoveError::SquareOccupied(mov.position))
        } else {
            Ok(())
        }
    }
}

/// Precondition: It must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Rejects moves by the player who is not to move.
    #[instrument(skip(round))]
    pub fn check(mov: &Move, round: &RoundState) -> Result<(), MoveError> {
        if mov.player != round.to_move() {
            Err(MoveError::WrongPlayer(mov.player))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: round in progress, player's turn, square empty.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(round))]
    pub fn check(mov: &Move, round: &RoundState) -> Result<(), MoveError> {
        RoundInProgress::check(round)?;
        PlayersTurn::check(mov, round)?;
        SquareIsEmpty::check(mov, round)?;
        Ok(())
    }
}

/// Contract for move actions.
///
/// Postconditions:
/// - Board remains monotonic
/// - Players still alternate from the starter
/// - History remains consistent with board
/// - Exactly one square changed
pub struct MoveContract;

impl Contract<RoundState, Move> for MoveContract {
    fn pre(round: &RoundState, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, round).inspect_err(|e| warn!(%action, error = %e, "Move rejected"))
    }

    fn post(before: &RoundState, after: &RoundState) -> Result<(), MoveError> {
        RoundInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;

        let changed = before
            .board()
            .squares()
            .iter()
            .zip(after.board().squares())
            .filter(|(a, b)| a != b)
            .count();
        if changed != 1 || after.history().len() != before.history().len() + 1 {
            return Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: {} squares changed by one move",
                changed
            )));
        }

        Ok(())
    }
}

/// Asserts that all round invariants hold (panics on violation in debug builds).
pub fn assert_invariants(round: &RoundState) {
    debug_assert!(
        RoundInvariants::check_all(round).is_ok(),
        "Round invariants violated: {:?}",
        RoundInvariants::check_all(round)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Position, Square};

    #[test]
    fn test_precondition_empty_square() {
        let round = RoundState::new(Player::X);
        let action = Move::new(Player::X, Position::Center);
        assert!(MoveContract::pre(&round, &action).is_ok());
    }

    #[test]
    fn test_precondition_occupied_square() {
        let round = RoundState::replay(Player::X, &[Position::Center]).expect("legal move");
        let action = Move::new(Player::O, Position::Center);
        assert_eq!(
            MoveContract::pre(&round, &action),
            Err(MoveError::SquareOccupied(Position::Center))
        );
    }

    #[test]
    fn test_precondition_wrong_turn() {
        let round = RoundState::new(Player::X);
        let action = Move::new(Player::O, Position::Center);
        assert_eq!(
            MoveContract::pre(&round, &action),
            Err(MoveError::WrongPlayer(Player::O))
        );
    }

    #[test]
    fn test_precondition_round_over() {
        let round = RoundState::replay(
            Player::X,
            &[
                Position::TopLeft,
                Position::MiddleLeft,
                Position::TopCenter,
                Position::Center,
                Position::TopRight,
            ],
        )
        .expect("legal moves");
        let action = Move::new(Player::O, Position::BottomRight);
        assert_eq!(MoveContract::pre(&round, &action), Err(MoveError::RoundOver));
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = RoundState::new(Player::X);
        let mut after = before.clone();
        after
            .apply_move(Move::new(Player::X, Position::Center))
            .expect("legal move");
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = RoundState::new(Player::X);
        let mut after = before.clone();
        after
            .apply_move(Move::new(Player::X, Position::Center))
            .expect("legal move");
        after.board.set(Position::TopLeft, Square::Occupied(Player::O));
        assert!(MoveContract::post(&before, &after).is_err());
    }
}
