//! Match configuration: mode, difficulty, best-of, and player names.

use super::Player;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Name shown for X when none is given.
pub const DEFAULT_X_NAME: &str = "Player X";
/// Name shown for O when none is given.
pub const DEFAULT_O_NAME: &str = "Player O";
/// Name of the computer opponent.
pub const COMPUTER_NAME: &str = "Computer";

/// Who controls O.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Mode {
    /// Two people share the board.
    #[default]
    #[serde(rename = "pvp")]
    #[strum(to_string = "PVP")]
    PlayerVsPlayer,
    /// The human plays X against the computer as O.
    #[serde(rename = "cpu")]
    #[strum(to_string = "CPU")]
    PlayerVsComputer,
}

impl Mode {
    /// Switches to the other mode.
    #[instrument]
    pub fn toggle(self) -> Self {
        match self {
            Mode::PlayerVsPlayer => Mode::PlayerVsComputer,
            Mode::PlayerVsComputer => Mode::PlayerVsPlayer,
        }
    }

    /// Mark played by the computer in this mode.
    pub fn computer_mark(self) -> Option<Player> {
        match self {
            Mode::PlayerVsPlayer => None,
            Mode::PlayerVsComputer => Some(Player::O),
        }
    }
}

/// Strength of the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random moves.
    Easy,
    /// Win, block, center, corner, then random.
    #[default]
    Medium,
    /// Exhaustive minimax; never loses.
    Hard,
}

impl Difficulty {
    /// Cycles easy → medium → hard → easy.
    #[instrument]
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// Number of rounds a match is played over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::EnumIter,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum BestOf {
    /// A single decisive round.
    One,
    /// First to two round wins.
    #[default]
    Three,
    /// First to three round wins.
    Five,
}

impl BestOf {
    /// Number of rounds named by this setting.
    pub fn rounds(self) -> u32 {
        match self {
            BestOf::One => 1,
            BestOf::Three => 3,
            BestOf::Five => 5,
        }
    }

    /// Round wins needed to take the match: `ceil(rounds / 2)`.
    pub fn target_wins(self) -> u32 {
        self.rounds().div_ceil(2)
    }

    /// Cycles 1 → 3 → 5 → 1.
    #[instrument]
    pub fn next(self) -> Self {
        match self {
            BestOf::One => BestOf::Three,
            BestOf::Three => BestOf::Five,
            BestOf::Five => BestOf::One,
        }
    }
}

impl TryFrom<u32> for BestOf {
    type Error = String;

    fn try_from(rounds: u32) -> Result<Self, Self::Error> {
        match rounds {
            1 => Ok(BestOf::One),
            3 => Ok(BestOf::Three),
            5 => Ok(BestOf::Five),
            other => Err(format!("best-of must be 1, 3 or 5, got {}", other)),
        }
    }
}

impl From<BestOf> for u32 {
    fn from(best_of: BestOf) -> Self {
        best_of.rounds()
    }
}

impl std::fmt::Display for BestOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rounds())
    }
}

/// Settings that shape a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Who controls O.
    pub mode: Mode,
    /// Computer strength (used in [`Mode::PlayerVsComputer`]).
    pub difficulty: Difficulty,
    /// Match length.
    pub best_of: BestOf,
    /// Display name for X.
    pub player_x_name: String,
    /// Display name for O.
    pub player_o_name: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            difficulty: Difficulty::default(),
            best_of: BestOf::default(),
            player_x_name: DEFAULT_X_NAME.to_string(),
            player_o_name: DEFAULT_O_NAME.to_string(),
        }
    }
}

impl Configuration {
    /// Display name of `player`.
    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::X => &self.player_x_name,
            Player::O => &self.player_o_name,
        }
    }

    /// Trims names, fills blanks with defaults, and names the computer.
    #[instrument(skip(self))]
    pub fn normalize_names(&mut self) {
        self.player_x_name = or_default(&self.player_x_name, DEFAULT_X_NAME);
        self.player_o_name = match self.mode {
            Mode::PlayerVsComputer => COMPUTER_NAME.to_string(),
            Mode::PlayerVsPlayer if self.player_o_name.trim() == COMPUTER_NAME => {
                DEFAULT_O_NAME.to_string()
            }
            Mode::PlayerVsPlayer => or_default(&self.player_o_name, DEFAULT_O_NAME),
        };
    }
}

fn or_default(name: &str, default: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
