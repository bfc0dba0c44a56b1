//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). Rules are kept apart from
//! round bookkeeping so the computer opponent can evaluate look-ahead grids
//! with the same code the round engine uses.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{Evaluation, Line, WIN_LINES, check_winner, evaluate};
