//! Saved settings and scores.
//!
//! The saved blob is a flat JSON object. Loading never fails: each field
//! that is missing or malformed falls back to its own default.

use super::config::{
    BestOf, Configuration, DEFAULT_O_NAME, DEFAULT_X_NAME, Difficulty, Mode,
};
use super::match_state::Tally;
use super::Player;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{instrument, warn};

/// Presentation preferences that ride along with the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Play sounds on moves and round ends.
    pub sound_on: bool,
    /// Use the light palette.
    pub theme_light: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_on: true,
            theme_light: false,
        }
    }
}

/// Flat record of everything kept between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    /// Game mode.
    pub mode: Mode,
    /// Computer difficulty.
    pub difficulty: Difficulty,
    /// Match length.
    pub best_of: BestOf,
    /// Match round wins for X.
    pub match_x: u32,
    /// Match round wins for O.
    pub match_o: u32,
    /// Match draws.
    pub draws: u32,
    /// Scoreboard wins for X.
    pub score_x: u32,
    /// Scoreboard wins for O.
    pub score_o: u32,
    /// Scoreboard draws.
    pub score_d: u32,
    /// Display name for X.
    pub player_x_name: String,
    /// Display name for O.
    pub player_o_name: String,
    /// Sound preference.
    pub sound_on: bool,
    /// Theme preference.
    pub theme_light: bool,
    /// Player who opens the next round.
    pub round_starter: Player,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            difficulty: Difficulty::default(),
            best_of: BestOf::default(),
            match_x: 0,
            match_o: 0,
            draws: 0,
            score_x: 0,
            score_o: 0,
            score_d: 0,
            player_x_name: DEFAULT_X_NAME.to_string(),
            player_o_name: DEFAULT_O_NAME.to_string(),
            sound_on: true,
            theme_light: false,
            round_starter: Player::X,
        }
    }
}

impl SavedState {
    /// Parses a saved blob, defaulting every field that cannot be read.
    #[instrument(skip(raw), fields(len = raw.len()))]
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!(error = %e, "Saved state is not JSON, using defaults");
                Self::default()
            }
        }
    }

    /// Reads a saved blob field by field.
    #[instrument(skip(value))]
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            warn!("Saved state is not an object, using defaults");
            return Self::default();
        };

        let defaults = Self::default();
        let match_x = count(obj, "matchX").unwrap_or(0);
        let match_o = count(obj, "matchO").unwrap_or(0);
        let draws = count(obj, "draws").unwrap_or(0);

        Self {
            mode: typed(obj, "mode").unwrap_or(defaults.mode),
            difficulty: typed(obj, "difficulty").unwrap_or(defaults.difficulty),
            best_of: count(obj, "bestOf")
                .and_then(|n| BestOf::try_from(n).ok())
                .unwrap_or(defaults.best_of),
            match_x,
            match_o,
            draws,
            score_x: count(obj, "scoreX").unwrap_or(match_x),
            score_o: count(obj, "scoreO").unwrap_or(match_o),
            score_d: count(obj, "scoreD").unwrap_or(draws),
            player_x_name: typed(obj, "playerXName").unwrap_or(defaults.player_x_name),
            player_o_name: typed(obj, "playerOName").unwrap_or(defaults.player_o_name),
            sound_on: typed(obj, "soundOn").unwrap_or(defaults.sound_on),
            theme_light: typed(obj, "themeLight").unwrap_or(defaults.theme_light),
            round_starter: typed(obj, "roundStarter").unwrap_or(defaults.round_starter),
        }
    }

    /// Serializes the blob.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Configuration portion of the blob.
    pub fn configuration(&self) -> Configuration {
        Configuration {
            mode: self.mode,
            difficulty: self.difficulty,
            best_of: self.best_of,
            player_x_name: self.player_x_name.clone(),
            player_o_name: self.player_o_name.clone(),
        }
    }

    /// Match counters.
    pub fn tally(&self) -> Tally {
        Tally {
            x_wins: self.match_x,
            o_wins: self.match_o,
            draws: self.draws,
        }
    }

    /// Scoreboard totals.
    pub fn totals(&self) -> Tally {
        Tally {
            x_wins: self.score_x,
            o_wins: self.score_o,
            draws: self.score_d,
        }
    }

    /// Presentation preferences.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            sound_on: self.sound_on,
            theme_light: self.theme_light,
        }
    }
}

/// Reads `key` as `T`; `None` (with a warning) when present but malformed.
fn typed<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key).filter(|v| !v.is_null())?;
    serde_json::from_value(value.clone())
        .inspect_err(|e| warn!(field = key, error = %e, "Ignoring malformed saved field"))
        .ok()
}

/// Reads `key` as a non-negative count, accepting numbers or numeric strings.
fn count(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    let parsed = match obj.get(key)? {
        Value::Null => return None,
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        warn!(field = key, "Ignoring malformed saved count");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let state = SavedState {
            mode: Mode::PlayerVsComputer,
            difficulty: Difficulty::Hard,
            best_of: BestOf::Five,
            match_x: 2,
            match_o: 1,
            draws: 4,
            score_x: 2,
            score_o: 1,
            score_d: 4,
            player_x_name: "Ada".to_string(),
            player_o_name: "Computer".to_string(),
            sound_on: false,
            theme_light: true,
            round_starter: Player::O,
        };
        let raw = state.to_json().expect("serializable");
        assert_eq!(SavedState::from_json(&raw), state);
    }

    #[test]
    fn test_field_names() {
        let value = serde_json::to_value(SavedState::default()).expect("serializable");
        let obj = value.as_object().expect("object");
        for key in [
            "mode", "difficulty", "bestOf", "matchX", "matchO", "draws", "scoreX", "scoreO",
            "scoreD", "playerXName", "playerOName", "soundOn", "themeLight", "roundStarter",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(obj["mode"], json!("pvp"));
        assert_eq!(obj["bestOf"], json!(3));
        assert_eq!(obj["roundStarter"], json!("X"));
    }

    #[test]
    fn test_garbage_yields_defaults() {
        assert_eq!(SavedState::from_json("{not json"), SavedState::default());
        assert_eq!(SavedState::from_json("[1, 2]"), SavedState::default());
    }

    #[test]
    fn test_malformed_fields_default_individually() {
        let raw = json!({
            "mode": "cpu",
            "difficulty": "impossible",
            "bestOf": 4,
            "matchX": "2",
            "matchO": -1,
            "draws": null,
            "playerXName": 17,
            "soundOn": "yes",
            "roundStarter": "O"
        })
        .to_string();
        let state = SavedState::from_json(&raw);

        assert_eq!(state.mode, Mode::PlayerVsComputer);
        assert_eq!(state.difficulty, Difficulty::Medium);
        assert_eq!(state.best_of, BestOf::Three);
        assert_eq!(state.match_x, 2);
        assert_eq!(state.match_o, 0);
        assert_eq!(state.draws, 0);
        assert_eq!(state.player_x_name, DEFAULT_X_NAME);
        assert!(state.sound_on);
        assert_eq!(state.round_starter, Player::O);
    }

    #[test]
    fn test_scoreboard_defaults_to_match_counts() {
        let state = SavedState::from_json(r#"{"matchX": 1, "matchO": 2, "draws": 3}"#);
        assert_eq!(state.totals(), state.tally());
    }
}
