//! Screens other than the board itself.

mod start;

pub use start::{StartAction, StartScreen};
