//! Start screen: player names, mode, difficulty, and match length.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use strum::{EnumCount, EnumIter, IntoEnumIterator};
use tracing::{debug, info, instrument};
use ultimate_ttt_core::{
    BestOf, COMPUTER_NAME, Configuration, DEFAULT_O_NAME, DEFAULT_X_NAME, Difficulty, Mode,
};

use crate::ui::Palette;

/// Longest name the form accepts.
const MAX_NAME_LEN: usize = 16;

/// Form rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
enum Field {
    XName,
    OName,
    Mode,
    Difficulty,
    BestOf,
    Start,
}

/// What the controller should do after a key on the start screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartAction {
    /// Keep editing.
    Stay,
    /// Begin a fresh match with this configuration.
    Start(Configuration),
    /// Go back to the game without changes.
    Back,
    /// Exit the app.
    Quit,
}

/// State for the start screen.
#[derive(Debug, Clone)]
pub struct StartScreen {
    x_name: String,
    o_name: String,
    mode: Mode,
    difficulty: Difficulty,
    best_of: BestOf,
    focus: usize,
    can_go_back: bool,
}

impl StartScreen {
    /// Creates the form pre-filled from `config`.
    ///
    /// With `can_go_back`, Esc returns to the running game instead of
    /// quitting.
    #[instrument(skip(config))]
    pub fn new(config: &Configuration, can_go_back: bool) -> Self {
        debug!("Initializing StartScreen");
        let editable = |name: &str, default: &str| {
            if name == default || name == COMPUTER_NAME {
                String::new()
            } else {
                name.to_string()
            }
        };
        Self {
            x_name: editable(&config.player_x_name, DEFAULT_X_NAME),
            o_name: editable(&config.player_o_name, DEFAULT_O_NAME),
            mode: config.mode,
            difficulty: config.difficulty,
            best_of: config.best_of,
            focus: 0,
            can_go_back,
        }
    }

    /// Configuration described by the form.
    pub fn configuration(&self) -> Configuration {
        let mut config = Configuration {
            mode: self.mode,
            difficulty: self.difficulty,
            best_of: self.best_of,
            player_x_name: self.x_name.clone(),
            player_o_name: self.o_name.clone(),
        };
        config.normalize_names();
        config
    }

    fn field(&self) -> Field {
        Field::iter().nth(self.focus).unwrap_or(Field::Start)
    }

    /// True when `field` cannot be edited in the current mode.
    fn is_locked(&self, field: Field) -> bool {
        field == Field::OName && self.mode == Mode::PlayerVsComputer
    }

    fn move_focus(&mut self, forward: bool) {
        let count = Field::COUNT;
        loop {
            self.focus = if forward {
                (self.focus + 1) % count
            } else {
                (self.focus + count - 1) % count
            };
            if !self.is_locked(self.field()) {
                break;
            }
        }
    }

    fn is_editing_name(&self) -> bool {
        match self.field() {
            Field::XName => true,
            Field::OName => self.mode == Mode::PlayerVsPlayer,
            _ => false,
        }
    }

    fn name_mut(&mut self) -> Option<&mut String> {
        match self.field() {
            Field::XName => Some(&mut self.x_name),
            Field::OName if self.mode == Mode::PlayerVsPlayer => Some(&mut self.o_name),
            _ => None,
        }
    }

    #[instrument(skip(self))]
    fn cycle(&mut self) {
        match self.field() {
            Field::Mode => {
                self.mode = self.mode.toggle();
                if self.mode == Mode::PlayerVsPlayer && self.o_name == COMPUTER_NAME {
                    self.o_name.clear();
                }
            }
            Field::Difficulty => self.difficulty = self.difficulty.next(),
            Field::BestOf => self.best_of = self.best_of.next(),
            _ => return,
        }
        info!(mode = %self.mode, difficulty = %self.difficulty, best_of = %self.best_of, "Start options changed");
    }

    /// Handles a key press.
    #[instrument(skip(self, key), fields(code = ?key.code))]
    pub fn handle_key(&mut self, key: KeyEvent) -> StartAction {
        match key.code {
            KeyCode::Esc if self.can_go_back => StartAction::Back,
            KeyCode::Esc => StartAction::Quit,
            KeyCode::Enter => {
                let config = self.configuration();
                info!(mode = %config.mode, "Starting new match from start screen");
                StartAction::Start(config)
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_focus(true);
                StartAction::Stay
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.move_focus(false);
                StartAction::Stay
            }
            KeyCode::Backspace => {
                if let Some(name) = self.name_mut() {
                    name.pop();
                }
                StartAction::Stay
            }
            KeyCode::Char(c) if self.is_editing_name() => {
                if let Some(name) = self.name_mut()
                    && name.chars().count() < MAX_NAME_LEN
                    && !c.is_control()
                {
                    name.push(c);
                }
                StartAction::Stay
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                self.cycle();
                StartAction::Stay
            }
            _ => StartAction::Stay,
        }
    }

    /// Renders the form.
    #[instrument(skip(self, frame, palette))]
    pub fn render(&self, frame: &mut Frame, palette: &Palette) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.background)),
            area,
        );
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Ultimate Tic-Tac-Toe")
            .style(
                Style::default()
                    .fg(palette.title)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let name_value = |name: &str, placeholder: &str| {
            if name.is_empty() {
                format!("{}_", placeholder)
            } else {
                format!("{}_", name)
            }
        };
        let items: Vec<ListItem> = Field::iter()
            .map(|field| {
                let text = match field {
                    Field::XName => {
                        format!("X name        {}", name_value(&self.x_name, DEFAULT_X_NAME))
                    }
                    Field::OName if self.is_locked(field) => {
                        format!("O name        {}", COMPUTER_NAME)
                    }
                    Field::OName => {
                        format!("O name        {}", name_value(&self.o_name, DEFAULT_O_NAME))
                    }
                    Field::Mode => format!("Mode          [ {} ]", self.mode),
                    Field::Difficulty => format!("Difficulty    [ {} ]", self.difficulty),
                    Field::BestOf => format!("Best of       [ {} ]", self.best_of),
                    Field::Start => "Start match".to_string(),
                };
                let style = if self.is_locked(field) {
                    Style::default().fg(palette.muted)
                } else {
                    Style::default().fg(palette.text)
                };
                ListItem::new(text).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("New Match"))
            .highlight_style(
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(self.focus));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let back = if self.can_go_back { "Esc: Back" } else { "Esc: Quit" };
        let help = Paragraph::new(format!(
            "↑↓ / Tab: Move | type: Name | ←→ / Space: Change | Enter: Start | {}",
            back
        ))
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut StartScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_names_and_start() {
        let mut screen = StartScreen::new(&Configuration::default(), false);
        assert_eq!(screen.x_name, "");
        type_text(&mut screen, "Ada");
        screen.handle_key(key(KeyCode::Down));
        type_text(&mut screen, "Grace");

        let StartAction::Start(config) = screen.handle_key(key(KeyCode::Enter)) else {
            panic!("expected start");
        };
        assert_eq!(config.player_x_name, "Ada");
        assert_eq!(config.player_o_name, "Grace");
    }

    #[test]
    fn test_empty_names_default() {
        let mut screen = StartScreen::new(&Configuration::default(), false);
        type_text(&mut screen, "   ");
        let config = screen.configuration();
        assert_eq!(config.player_x_name, DEFAULT_X_NAME);
        assert_eq!(config.player_o_name, DEFAULT_O_NAME);
    }

    #[test]
    fn test_computer_mode_locks_o_name() {
        let mut screen = StartScreen::new(&Configuration::default(), false);
        screen.handle_key(key(KeyCode::Down));
        type_text(&mut screen, "Grace");
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Right));
        assert_eq!(screen.mode, Mode::PlayerVsComputer);
        assert_eq!(screen.configuration().player_o_name, COMPUTER_NAME);

        // Focus skips the locked O field.
        for _ in 0..Field::COUNT {
            screen.handle_key(key(KeyCode::Up));
            assert_ne!(screen.field(), Field::OName);
        }
    }

    #[test]
    fn test_cycles_options() {
        let mut screen = StartScreen::new(&Configuration::default(), false);
        for _ in 0..3 {
            screen.handle_key(key(KeyCode::Tab));
        }
        assert_eq!(screen.field(), Field::Difficulty);
        screen.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(screen.difficulty, Difficulty::Hard);
        screen.handle_key(key(KeyCode::Tab));
        screen.handle_key(key(KeyCode::Right));
        assert_eq!(screen.best_of, BestOf::Five);
    }

    #[test]
    fn test_escape() {
        let mut fresh = StartScreen::new(&Configuration::default(), false);
        assert_eq!(fresh.handle_key(key(KeyCode::Esc)), StartAction::Quit);
        let mut running = StartScreen::new(&Configuration::default(), true);
        assert_eq!(running.handle_key(key(KeyCode::Esc)), StartAction::Back);
    }
}
