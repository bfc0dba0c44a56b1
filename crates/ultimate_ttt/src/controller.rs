//! Controller: owns the session and turns events into state changes.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_getters::Getters;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use ratatui::Frame;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};
use ultimate_ttt_core::{GameSession, Position, Preferences, RoundStatus, RoundTransition};

use crate::app_config::AppConfig;
use crate::effects::{Celebration, Cue};
use crate::events::AppEvent;
use crate::input::{digit_position, move_cursor};
use crate::scheduler::ComputerScheduler;
use crate::screens::{StartAction, StartScreen};
use crate::store::Store;
use crate::ui::{self, GameView, Palette};

/// Whether the event loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the app.
    Quit,
}

/// Active screen.
#[derive(Debug)]
pub enum ActiveScreen {
    /// Match setup form.
    Start(StartScreen),
    /// The board.
    Game,
}

/// Drives the app: every event goes through [`Controller::handle`], one at
/// a time, so moves never interleave.
#[derive(Debug, Getters)]
pub struct Controller {
    session: GameSession,
    prefs: Preferences,
    cursor: Position,
    screen: ActiveScreen,
    celebration: Option<Celebration>,
    notice: Option<String>,
    #[getter(skip)]
    store: Store,
    #[getter(skip)]
    scheduler: ComputerScheduler,
    #[getter(skip)]
    celebration_length: Duration,
    #[getter(skip)]
    cues: Vec<Cue>,
    #[getter(skip)]
    rng: StdRng,
}

impl Controller {
    /// Creates a controller, resuming from `store` unless `fresh`.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(config, store, events))]
    pub fn new(
        config: &AppConfig,
        store: Store,
        fresh: bool,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self::with_rng(config, store, fresh, events, StdRng::from_os_rng())
    }

    /// Like [`Controller::new`] with a caller-supplied random source.
    #[instrument(skip(config, store, events, rng))]
    pub fn with_rng(
        config: &AppConfig,
        store: Store,
        fresh: bool,
        events: UnboundedSender<AppEvent>,
        rng: StdRng,
    ) -> Self {
        let saved = if fresh {
            info!("Fresh start requested, ignoring saved state");
            None
        } else {
            store.load().unwrap_or_else(|e| {
                warn!(error = %e, "Could not read saved state");
                None
            })
        };

        let (session, prefs, screen) = match saved {
            Some(saved) => {
                info!("Resuming saved game");
                (
                    GameSession::restore(&saved),
                    saved.preferences(),
                    ActiveScreen::Game,
                )
            }
            None => {
                let session = GameSession::default();
                let screen = ActiveScreen::Start(StartScreen::new(session.config(), false));
                (session, Preferences::default(), screen)
            }
        };

        let mut controller = Self {
            session,
            prefs,
            cursor: Position::Center,
            screen,
            celebration: None,
            notice: None,
            store,
            scheduler: ComputerScheduler::new(config.computer_delay(), events),
            celebration_length: config.celebration(),
            cues: Vec::new(),
            rng,
        };
        controller.schedule_computer_if_due();
        controller
    }

    /// True while the start screen is showing.
    pub fn is_on_start_screen(&self) -> bool {
        matches!(self.screen, ActiveScreen::Start(_))
    }

    /// True while a computer move is scheduled.
    pub fn is_computer_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Sounds requested since the last call. Empty when sound is off.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Applies one event.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => {
                self.expire_celebration(Instant::now());
                Flow::Continue
            }
            AppEvent::ComputerTurn { generation } => {
                self.play_computer(generation);
                Flow::Continue
            }
        }
    }

    /// Renders the active screen.
    pub fn render(&self, frame: &mut Frame) {
        match &self.screen {
            ActiveScreen::Start(screen) => screen.render(frame, &Palette::for_prefs(self.prefs)),
            ActiveScreen::Game => ui::draw_game(
                frame,
                &GameView {
                    session: &self.session,
                    cursor: self.cursor,
                    prefs: self.prefs,
                    celebration: self.celebration.as_ref(),
                    notice: self.notice.as_deref(),
                    now: Instant::now(),
                },
            ),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            info!("Ctrl-C, quitting");
            return Flow::Quit;
        }
        match &mut self.screen {
            ActiveScreen::Start(screen) => {
                let action = screen.handle_key(key);
                self.handle_start_action(action)
            }
            ActiveScreen::Game => self.handle_game_key(key),
        }
    }

    #[instrument(skip(self))]
    fn handle_start_action(&mut self, action: StartAction) -> Flow {
        match action {
            StartAction::Stay => {}
            StartAction::Start(config) => {
                self.scheduler.cancel();
                self.session.configure(config);
                self.enter_game();
                self.persist();
            }
            StartAction::Back => self.enter_game(),
            StartAction::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn enter_game(&mut self) {
        self.screen = ActiveScreen::Game;
        self.cursor = Position::Center;
        self.celebration = None;
        self.schedule_computer_if_due();
    }

    #[instrument(skip(self, key), fields(code = ?key.code))]
    fn handle_game_key(&mut self, key: KeyEvent) -> Flow {
        self.notice = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                info!("Quit requested");
                return Flow::Quit;
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key.code);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.session.round().is_over() {
                    self.restart(GameSession::next_round);
                } else {
                    self.play_human(self.cursor);
                }
            }
            KeyCode::Char('u') => self.restart(GameSession::undo),
            KeyCode::Char('r') => self.restart(|s| s.reset_round(true)),
            KeyCode::Char('c') => self.restart(GameSession::start_new_match),
            KeyCode::Char('n') => self.restart(GameSession::next_round),
            KeyCode::Char('m') => self.restart(|s| {
                let mode = s.config().mode.toggle();
                s.set_mode(mode)
            }),
            KeyCode::Char('d') => self.restart(|s| {
                let difficulty = s.config().difficulty.next();
                s.set_difficulty(difficulty)
            }),
            KeyCode::Char('b') => self.restart(|s| {
                let best_of = s.config().best_of.next();
                s.set_best_of(best_of)
            }),
            KeyCode::Char('s') => {
                self.prefs.sound_on = !self.prefs.sound_on;
                info!(sound_on = self.prefs.sound_on, "Sound toggled");
                self.persist();
            }
            KeyCode::Char('t') => {
                self.prefs.theme_light = !self.prefs.theme_light;
                info!(theme_light = self.prefs.theme_light, "Theme toggled");
                self.persist();
            }
            KeyCode::Char('o') => {
                self.scheduler.cancel();
                self.screen = ActiveScreen::Start(StartScreen::new(self.session.config(), true));
            }
            code => {
                if let Some(pos) = digit_position(code) {
                    self.cursor = pos;
                    self.play_human(pos);
                }
            }
        }
        Flow::Continue
    }

    /// Runs a board-changing session operation: any pending computer move
    /// and celebration are dropped first.
    fn restart(&mut self, op: impl FnOnce(&mut GameSession) -> RoundTransition) {
        self.scheduler.cancel();
        self.celebration = None;
        let transition = op(&mut self.session);
        debug!(?transition, "Board restarted");
        self.persist();
        self.schedule_computer_if_due();
    }

    #[instrument(skip(self))]
    fn play_human(&mut self, pos: Position) {
        if self.session.is_computer_turn() {
            debug!("Ignoring input during the computer's turn");
            self.notice = Some("wait for the computer".to_string());
            return;
        }
        match self.session.apply_move(pos) {
            Ok(transition) => self.after_move(transition),
            Err(e) => {
                warn!(error = %e, "Move rejected");
                self.notice = Some(e.to_string());
            }
        }
    }

    #[instrument(skip(self))]
    fn play_computer(&mut self, generation: u64) {
        if !self.scheduler.accept(generation) {
            return;
        }
        match self.session.play_computer_move(&mut self.rng) {
            Ok(Some(transition)) => self.after_move(transition),
            Ok(None) => debug!("Computer move no longer due"),
            Err(e) => warn!(error = %e, "Computer move rejected"),
        }
    }

    fn after_move(&mut self, transition: RoundTransition) {
        let cue = match transition.status {
            RoundStatus::InProgress => Cue::Move,
            RoundStatus::Over(outcome) if outcome.is_draw() => Cue::Draw,
            RoundStatus::Over(_) => {
                self.celebration = Some(Celebration::new(
                    Instant::now(),
                    self.celebration_length,
                    self.rng.next_u64(),
                ));
                Cue::Win
            }
        };
        if self.prefs.sound_on {
            self.cues.push(cue);
        }
        self.persist();
        self.schedule_computer_if_due();
    }

    fn schedule_computer_if_due(&mut self) {
        if matches!(self.screen, ActiveScreen::Game) && self.session.is_computer_turn() {
            self.scheduler.schedule();
        }
    }

    fn expire_celebration(&mut self, now: Instant) {
        if self.celebration.is_some_and(|c| c.is_finished(now)) {
            debug!("Celebration finished");
            self.celebration = None;
        }
    }

    fn persist(&self) {
        self.store
            .save_best_effort(&self.session.snapshot(self.prefs));
    }
}
