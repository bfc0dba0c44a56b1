//! Tests for key handling, persistence, and computer pacing.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use ultimate_ttt::{AppConfig, AppEvent, Controller, Cue, Flow, Store};
use ultimate_ttt_core::{BestOf, Difficulty, Mode, Player, Position, SavedState};

struct Harness {
    _dir: TempDir,
    store: Store,
    controller: Controller,
    events: UnboundedReceiver<AppEvent>,
}

impl Harness {
    fn press(&mut self, code: KeyCode) -> Flow {
        self.controller
            .handle(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn press_all(&mut self, keys: &str) {
        for c in keys.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn saved(&self) -> SavedState {
        self.store
            .load()
            .expect("Load failed")
            .expect("State saved")
    }

    /// Waits for the next event and feeds it to the controller.
    async fn pump(&mut self, wait: Duration) -> bool {
        match tokio::time::timeout(wait, self.events.recv()).await {
            Ok(Some(event)) => {
                self.controller.handle(event);
                true
            }
            _ => false,
        }
    }
}

fn start(saved: Option<SavedState>, fresh: bool, config: AppConfig) -> Harness {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("state.json");
    let store = Store::new(&path);
    if let Some(saved) = saved {
        store.save(&saved).expect("Save failed");
    }
    let config = config.with_state_file(&path);
    let (tx, events) = mpsc::unbounded_channel();
    let controller =
        Controller::with_rng(&config, store.clone(), fresh, tx, StdRng::seed_from_u64(11));
    Harness {
        _dir: dir,
        store,
        controller,
        events,
    }
}

fn quick() -> AppConfig {
    AppConfig::default().with_computer_delay_ms(10)
}

fn cpu_saved(difficulty: Difficulty) -> SavedState {
    SavedState {
        mode: Mode::PlayerVsComputer,
        difficulty,
        player_o_name: "Computer".to_string(),
        ..SavedState::default()
    }
}

#[tokio::test]
async fn test_first_run_opens_start_screen() {
    let mut h = start(None, false, quick());
    assert!(h.controller.is_on_start_screen());
    assert!(h.store.load().expect("Load failed").is_none());

    h.press_all("Ada");
    assert_eq!(h.press(KeyCode::Enter), Flow::Continue);

    assert!(!h.controller.is_on_start_screen());
    let saved = h.saved();
    assert_eq!(saved.player_x_name, "Ada");
    assert_eq!(saved.player_o_name, "Player O");
}

#[tokio::test]
async fn test_resumes_saved_scores() {
    let saved = SavedState {
        best_of: BestOf::Five,
        match_x: 2,
        draws: 1,
        player_x_name: "Ada".to_string(),
        ..SavedState::default()
    };
    let h = start(Some(saved), false, quick());
    assert!(!h.controller.is_on_start_screen());
    let score = h.controller.session().score();
    assert_eq!(score.tally().x_wins, 2);
    assert_eq!(score.tally().draws, 1);
    assert_eq!(score.best_of(), BestOf::Five);
    assert_eq!(h.controller.session().config().player_x_name, "Ada");
}

#[tokio::test]
async fn test_fresh_ignores_saved_state() {
    let saved = SavedState {
        match_x: 2,
        ..SavedState::default()
    };
    let h = start(Some(saved), true, quick());
    assert!(h.controller.is_on_start_screen());
    assert_eq!(h.controller.session().score().tally().x_wins, 0);
}

#[tokio::test]
async fn test_computer_replies_after_delay() {
    let mut h = start(Some(cpu_saved(Difficulty::Hard)), false, quick());
    h.press(KeyCode::Char('5'));
    assert!(h.controller.is_computer_pending());
    assert_eq!(h.controller.session().round().history().len(), 1);

    assert!(h.pump(Duration::from_secs(2)).await, "computer never moved");
    let round = h.controller.session().round();
    assert_eq!(round.history().len(), 2);
    assert_eq!(round.to_move(), Player::X);
    assert!(!h.controller.is_computer_pending());
}

#[tokio::test]
async fn test_reset_drops_pending_computer_move() {
    let mut h = start(
        Some(cpu_saved(Difficulty::Easy)),
        false,
        AppConfig::default().with_computer_delay_ms(30),
    );
    h.press(KeyCode::Char('1'));
    assert!(h.controller.is_computer_pending());

    h.press(KeyCode::Char('r'));
    assert!(!h.controller.is_computer_pending());
    assert!(h.controller.session().round().history().is_empty());

    // Whatever was already queued must not land on the cleared board.
    while h.pump(Duration::from_millis(120)).await {}
    assert!(h.controller.session().round().history().is_empty());
}

#[tokio::test]
async fn test_undo_while_computer_pending_keeps_human_turn() {
    let mut h = start(
        Some(cpu_saved(Difficulty::Hard)),
        false,
        AppConfig::default().with_computer_delay_ms(30),
    );
    h.press(KeyCode::Char('1'));
    assert!(h.pump(Duration::from_secs(2)).await, "computer never moved");
    assert_eq!(h.controller.session().round().history().len(), 2);

    h.press(KeyCode::Char('3'));
    assert!(h.controller.is_computer_pending());

    h.press(KeyCode::Char('u'));
    let session = h.controller.session();
    assert_eq!(session.round().history().len(), 2);
    assert_eq!(session.round().history()[0], Position::TopLeft);
    assert_eq!(session.to_move(), Player::X);
    assert!(!session.is_computer_turn());
    assert!(!h.controller.is_computer_pending());

    // The cancelled reply must not land afterwards.
    while h.pump(Duration::from_millis(120)).await {}
    assert_eq!(h.controller.session().round().history().len(), 2);
    assert_eq!(h.saved().match_x, 0);
}

#[tokio::test]
async fn test_input_ignored_during_computer_turn() {
    let mut h = start(
        Some(cpu_saved(Difficulty::Medium)),
        false,
        AppConfig::default().with_computer_delay_ms(500),
    );
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('2'));
    assert_eq!(h.controller.session().round().history(), &[Position::TopLeft]);
    assert!(h.controller.notice().is_some());
}

#[tokio::test]
async fn test_round_win_celebrates_and_counts() {
    let mut h = start(
        Some(SavedState::default()),
        false,
        quick().with_celebration_ms(0),
    );
    h.press_all("14253");

    let session = h.controller.session();
    assert!(session.round().is_over());
    assert_eq!(session.score().tally().x_wins, 1);
    assert!(h.controller.celebration().is_some());
    assert_eq!(h.controller.take_cues().last(), Some(&Cue::Win));
    assert_eq!(h.saved().match_x, 1);

    h.controller.handle(AppEvent::Tick);
    assert!(h.controller.celebration().is_none());

    h.press(KeyCode::Char('n'));
    let session = h.controller.session();
    assert!(session.round().history().is_empty());
    assert_eq!(session.to_move(), Player::O);
    assert_eq!(h.saved().round_starter, Player::O);
}

#[tokio::test]
async fn test_sound_toggle_silences_cues() {
    let mut h = start(Some(SavedState::default()), false, quick());
    h.press(KeyCode::Char('5'));
    assert_eq!(h.controller.take_cues(), vec![Cue::Move]);

    h.press(KeyCode::Char('s'));
    assert!(!h.saved().sound_on);
    h.press(KeyCode::Char('1'));
    assert!(h.controller.take_cues().is_empty());
}

#[tokio::test]
async fn test_theme_toggle_persists() {
    let mut h = start(Some(SavedState::default()), false, quick());
    h.press(KeyCode::Char('t'));
    assert!(h.controller.prefs().theme_light);
    assert!(h.saved().theme_light);
}

#[tokio::test]
async fn test_settings_keys_start_new_match() {
    let mut h = start(Some(SavedState::default()), false, quick());
    h.press_all("14253");
    assert_eq!(h.controller.session().score().tally().x_wins, 1);

    h.press(KeyCode::Char('b'));
    let session = h.controller.session();
    assert_eq!(session.config().best_of, BestOf::Five);
    assert_eq!(session.score().tally().x_wins, 0);
    assert!(session.round().history().is_empty());

    h.press(KeyCode::Char('d'));
    assert_eq!(h.controller.session().config().difficulty, Difficulty::Hard);

    h.press(KeyCode::Char('m'));
    let saved = h.saved();
    assert_eq!(saved.mode, Mode::PlayerVsComputer);
    assert_eq!(saved.player_o_name, "Computer");
}

#[tokio::test]
async fn test_arrows_and_enter_place_mark() {
    let mut h = start(Some(SavedState::default()), false, quick());
    assert_eq!(*h.controller.cursor(), Position::Center);
    h.press(KeyCode::Up);
    h.press(KeyCode::Left);
    h.press(KeyCode::Enter);
    assert_eq!(h.controller.session().round().history(), &[Position::TopLeft]);

    h.press(KeyCode::Char('u'));
    assert!(h.controller.session().round().history().is_empty());
}

#[tokio::test]
async fn test_occupied_square_rejected() {
    let mut h = start(Some(SavedState::default()), false, quick());
    h.press_all("55");
    assert_eq!(h.controller.session().round().history().len(), 1);
    assert!(h.controller.notice().is_some());
}

#[tokio::test]
async fn test_start_screen_round_trip() {
    let mut h = start(Some(SavedState::default()), false, quick());
    h.press(KeyCode::Char('5'));
    h.press(KeyCode::Char('o'));
    assert!(h.controller.is_on_start_screen());

    h.press(KeyCode::Esc);
    assert!(!h.controller.is_on_start_screen());
    assert_eq!(h.controller.session().round().history().len(), 1);
}

#[tokio::test]
async fn test_quit_keys() {
    let mut h = start(Some(SavedState::default()), false, quick());
    assert_eq!(h.press(KeyCode::Char('q')), Flow::Quit);

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(h.controller.handle(AppEvent::Key(ctrl_c)), Flow::Quit);
}
