//! Ultimate tic-tac-toe core - game, match, and computer opponent logic.
//!
//! # Architecture
//!
//! - **Board**: the 3x3 grid ([`Board`], [`Square`], [`Position`])
//! - **Rules**: win and draw detection ([`rules`])
//! - **Round**: move application, undo, and the round lifecycle ([`RoundState`])
//! - **Opponent**: random, heuristic, and minimax strategies ([`opponent`])
//! - **Match**: best-of scoring and starter alternation ([`MatchState`])
//! - **Session**: the owned state object presentation code drives ([`GameSession`])
//!
//! # Example
//!
//! ```
//! use ultimate_ttt_core::{GameSession, Player, Position};
//!
//! let mut session = GameSession::default();
//! let transition = session.apply_move(Position::Center).unwrap();
//! assert_eq!(transition.to_move, Player::O);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod config;
pub mod contracts;
pub mod invariants;
mod match_state;
pub mod opponent;
mod phases;
mod position;
mod round;
pub mod rules;
mod saved;
mod session;
mod types;

pub use action::{Move, MoveError};
pub use config::{
    BestOf, COMPUTER_NAME, Configuration, DEFAULT_O_NAME, DEFAULT_X_NAME, Difficulty, Mode,
};
pub use match_state::{MatchState, Tally};
pub use opponent::{Strategy, strategy_for};
pub use phases::{Outcome, RoundStatus};
pub use position::Position;
pub use round::RoundState;
pub use rules::{Evaluation, Line};
pub use saved::{Preferences, SavedState};
pub use session::{GameSession, RoundTransition};
pub use types::{Board, Player, Square};
