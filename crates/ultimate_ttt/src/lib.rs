//! Ultimate Tic-Tac-Toe in the terminal.
//!
//! Wraps [`ultimate_ttt_core`] in a `ratatui` interface: a start screen for
//! names and match settings, the board with score tracking, a paced
//! computer opponent, and settings that persist between runs.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app_config;
mod cli;
mod controller;
mod effects;
mod events;
mod input;
mod logging;
mod scheduler;
mod screens;
mod store;
mod tui;
pub mod ui;

pub use app_config::{AppConfig, ConfigError};
pub use cli::Cli;
pub use controller::{ActiveScreen, Controller, Flow};
pub use effects::{Celebration, Cue, ring};
pub use events::AppEvent;
pub use input::{digit_position, move_cursor};
pub use logging::init_logging;
pub use scheduler::ComputerScheduler;
pub use screens::{StartAction, StartScreen};
pub use store::{Store, StoreError};
pub use tui::run;
