//! Tests for saved-state storage.

use tempfile::TempDir;

use ultimate_ttt::Store;
use ultimate_ttt_core::{BestOf, Difficulty, Mode, Player, SavedState};

fn setup_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Store::new(dir.path().join("state.json"));
    (dir, store)
}

#[test]
fn test_load_missing_is_none() {
    let (_dir, store) = setup_store();
    assert!(store.load().expect("Load failed").is_none());
}

#[test]
fn test_save_then_load() {
    let (_dir, store) = setup_store();
    let state = SavedState {
        mode: Mode::PlayerVsComputer,
        difficulty: Difficulty::Easy,
        best_of: BestOf::One,
        match_x: 1,
        score_x: 4,
        player_x_name: "Ada".to_string(),
        player_o_name: "Computer".to_string(),
        theme_light: true,
        round_starter: Player::O,
        ..SavedState::default()
    };
    store.save(&state).expect("Save failed");
    assert_eq!(store.load().expect("Load failed"), Some(state));
}

#[test]
fn test_save_creates_parent_dirs() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Store::new(dir.path().join("nested").join("deeper").join("state.json"));
    store.save(&SavedState::default()).expect("Save failed");
    assert!(store.path().exists());
}

#[test]
fn test_corrupt_file_loads_defaults() {
    let (_dir, store) = setup_store();
    std::fs::write(store.path(), "{\"mode\": \"cpu\", \"matchX\": ").expect("Write failed");
    let state = store.load().expect("Load failed").expect("File exists");
    assert_eq!(state, SavedState::default());
}

#[test]
fn test_partial_file_keeps_good_fields() {
    let (_dir, store) = setup_store();
    std::fs::write(
        store.path(),
        r#"{"mode": "cpu", "bestOf": "5", "matchO": 2, "themeLight": "dark"}"#,
    )
    .expect("Write failed");
    let state = store.load().expect("Load failed").expect("File exists");
    assert_eq!(state.mode, Mode::PlayerVsComputer);
    assert_eq!(state.best_of, BestOf::Five);
    assert_eq!(state.match_o, 2);
    assert_eq!(state.score_o, 2);
    assert!(!state.theme_light);
}

#[test]
fn test_unwritable_path_is_error() {
    let (dir, _store) = setup_store();
    // A directory where the file should be.
    let blocked = dir.path().join("blocked");
    std::fs::create_dir(&blocked).expect("Create dir failed");
    let store = Store::new(&blocked);
    assert!(store.save(&SavedState::default()).is_err());
    store.save_best_effort(&SavedState::default());
}
